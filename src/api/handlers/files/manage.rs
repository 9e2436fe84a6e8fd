use crate::api::error::AppError;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use super::types::{DeleteAllResponse, FailedDeletion, MessageResponse};

#[utoipa::path(
    delete,
    path = "/files/{name}",
    params(
        ("name" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 500, description = "File could not be deleted")
    ),
    tag = "files"
)]
pub async fn delete_file(
    State(state): State<crate::AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    remove_named(&state, &name).await
}

/// The static `/files/zip` route owns every method on that path, so the
/// delete for a file literally named "zip" has to be wired there explicitly.
pub async fn delete_zip_entry(
    State(state): State<crate::AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    remove_named(&state, "zip").await
}

async fn remove_named(
    state: &crate::AppState,
    name: &str,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .storage
        .delete_file(name)
        .await
        .map_err(|e| AppError::DeleteFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

    info!("🗑️  Deleted {}", name);
    Ok(Json(MessageResponse {
        message: format!("File is deleted: {}", name),
    }))
}

#[utoipa::path(
    delete,
    path = "/files",
    responses(
        (status = 200, description = "Per-file outcome of the bulk delete", body = DeleteAllResponse),
        (status = 500, description = "Storage directory could not be scanned")
    ),
    tag = "files"
)]
pub async fn delete_all_files(
    State(state): State<crate::AppState>,
) -> Result<Json<DeleteAllResponse>, AppError> {
    let outcome = state.storage.delete_all_files().await?;

    info!(
        "🗑️  Bulk delete removed {} file(s), {} failed",
        outcome.deleted.len(),
        outcome.failed.len()
    );

    Ok(Json(DeleteAllResponse {
        deleted: outcome.deleted,
        failed: outcome
            .failed
            .into_iter()
            .map(|(name, error)| FailedDeletion { name, error })
            .collect(),
    }))
}
