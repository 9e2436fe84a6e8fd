use crate::api::error::AppError;
use axum::{body::Body, extract::State, http::header, response::Response};
use futures::StreamExt;
use tokio_util::io::ReaderStream;
use tracing::info;

#[utoipa::path(
    get,
    path = "/files/zip",
    responses(
        (status = 200, description = "Zip archive of every stored file", content_type = "application/zip"),
        (status = 500, description = "Archive could not be created")
    ),
    tag = "files"
)]
pub async fn download_archive(State(state): State<crate::AppState>) -> Result<Response, AppError> {
    let archive = state
        .archive
        .bundle_all()
        .await
        .map_err(|e| AppError::ArchiveCreationFailed(e.to_string()))?;

    let file = tokio::fs::File::open(archive.path())
        .await
        .map_err(|e| AppError::ArchiveCreationFailed(e.to_string()))?;

    info!(
        "📦 Streaming archive with {} entries ({} bytes)",
        archive.entry_count, archive.size_bytes
    );

    let size = archive.size_bytes;
    // The guard rides inside the stream so the artifact survives exactly as
    // long as the response body, however the request ends.
    let stream = ReaderStream::new(file).map(move |chunk| {
        let _ = &archive;
        chunk
    });

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"files.zip\"",
        )
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response)
}
