use crate::api::error::AppError;
use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tokio_util::io::ReaderStream;

#[utoipa::path(
    get,
    path = "/uploads/{name}",
    params(
        ("name" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "Raw file bytes"),
        (status = 400, description = "Invalid file name"),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn serve_upload(
    State(state): State<crate::AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let (file, size) = state.storage.open_read(&name).await?;
    let (content_type, content_disposition) = resolve_file_headers(&name);

    let stream = ReaderStream::new(file);
    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size)
        .header(header::CONTENT_DISPOSITION, content_disposition)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response)
}

/// Resolve content-type and content-disposition for a stored file.
pub(crate) fn resolve_file_headers(filename: &str) -> (&'static str, String) {
    let extension = filename.split('.').next_back().unwrap_or("").to_lowercase();
    let content_type = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    };

    let ascii_filename = filename
        .chars()
        .filter(|c| c.is_ascii() && !c.is_control() && *c != '"' && *c != '\\' && *c != ';')
        .take(64)
        .collect::<String>();
    let fallback_filename = if ascii_filename.is_empty() {
        "file"
    } else {
        &ascii_filename
    };

    let encoded_filename = utf8_percent_encode(filename, NON_ALPHANUMERIC).to_string();

    let disposition_type = if content_type.starts_with("image/")
        || content_type == "application/pdf"
        || content_type.starts_with("text/")
    {
        "inline"
    } else {
        "attachment"
    };

    let content_disposition = format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        disposition_type, fallback_filename, encoded_filename
    );

    (content_type, content_disposition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions_map_to_image_types() {
        assert_eq!(resolve_file_headers("photo.JPG").0, "image/jpeg");
        assert_eq!(resolve_file_headers("pixel.png").0, "image/png");
        assert_eq!(resolve_file_headers("anim.webp").0, "image/webp");
        assert_eq!(
            resolve_file_headers("unknown.blob").0,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_disposition_keeps_ascii_fallback_for_unicode_names() {
        let (content_type, disposition) = resolve_file_headers("fotoğraf.png");
        assert_eq!(content_type, "image/png");
        assert!(disposition.starts_with("inline; filename=\"fotoraf.png\""));
        assert!(disposition.contains("filename*=UTF-8''"));
    }
}
