use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload returned after a successful upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Name the file is stored (and addressed) under.
    pub file_name: String,
    /// Name the client sent, before sanitization.
    pub original_name: String,
}

/// One stored file as reported by the listing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileInfoResponse {
    pub name: String,
    /// Size in kilobytes, rendered with two decimal places.
    #[schema(example = "12.34")]
    pub size: String,
    /// Absolute URL the raw bytes can be fetched from.
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// A single file the bulk delete could not remove.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FailedDeletion {
    pub name: String,
    pub error: String,
}

/// Outcome summary for the bulk delete endpoint. Partial failure is a valid
/// result, not an error: callers inspect `failed` to see what survived.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteAllResponse {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDeletion>,
}
