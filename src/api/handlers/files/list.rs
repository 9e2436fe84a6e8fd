use crate::api::error::AppError;
use axum::{Json, extract::State};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use super::types::FileInfoResponse;

/// Characters that must not appear raw inside a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/')
    .add(b'\\');

#[utoipa::path(
    get,
    path = "/files",
    responses(
        (status = 200, description = "All stored files", body = [FileInfoResponse]),
        (status = 500, description = "Storage directory could not be scanned")
    ),
    tag = "files"
)]
pub async fn list_files(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<FileInfoResponse>>, AppError> {
    let objects = state.storage.list_files().await?;
    let base = state.config.public_base_url.trim_end_matches('/');

    let files = objects
        .into_iter()
        .map(|object| FileInfoResponse {
            url: format!(
                "{}/uploads/{}",
                base,
                utf8_percent_encode(&object.name, PATH_SEGMENT)
            ),
            size: format!("{:.2}", object.size_bytes as f64 / 1024.0),
            name: object.name,
        })
        .collect();

    Ok(Json(files))
}
