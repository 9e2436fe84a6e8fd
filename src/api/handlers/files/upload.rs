use crate::api::error::AppError;
use crate::utils::validation::sanitize_file_name;
use axum::{
    Json,
    extract::{Multipart, State},
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::info;

use super::types::UploadResponse;

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Multipart, description = "Multipart form with a single `file` field"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "No file provided or invalid file name"),
        (status = 413, description = "Request body exceeds the maximum allowed limit")
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    // Use a result to capture errors so we can consume the multipart stream if needed
    let result: Result<Json<UploadResponse>, AppError> = async {
        let mut stored: Option<UploadResponse> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("length limit exceeded") {
                AppError::PayloadTooLarge(
                    "Request body exceeds the maximum allowed limit".to_string(),
                )
            } else {
                AppError::BadRequest(err_msg)
            }
        })? {
            // Only the first `file` field counts; anything else is skipped.
            if field.name() != Some("file") || stored.is_some() {
                continue;
            }

            let original_name = field.file_name().unwrap_or("unnamed").to_string();

            let file_name = sanitize_file_name(&original_name)
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            let body_with_io_error = field.map_err(std::io::Error::other);
            let reader = StreamReader::new(body_with_io_error);

            let written = state
                .storage
                .save_stream(&file_name, Box::new(reader))
                .await
                .map_err(|e| {
                    AppError::Internal(format!(
                        "Could not upload the file: {}. {}",
                        original_name, e
                    ))
                })?;

            info!("📤 Uploaded {} ({} bytes)", file_name, written);
            stored = Some(UploadResponse {
                file_name,
                original_name,
            });
        }

        stored.map(Json).ok_or(AppError::NoFileProvided)
    }
    .await;

    match result {
        Ok(res) => Ok(res),
        Err(e) => {
            // CRITICAL: Consume the remaining multipart stream to avoid TCP reset ("Network error" in browser)
            tracing::warn!("Upload failed early: {}. Consuming remaining stream...", e);
            while let Ok(Some(mut field)) = multipart.next_field().await {
                while let Ok(Some(_)) = field.chunk().await {}
            }
            Err(e)
        }
    }
}
