//! Client-side upload pipeline: concurrent multipart uploads with per-file
//! progress tracking and a single listing refresh per batch.

pub mod orchestrator;
pub mod progress;
pub mod transport;

pub use orchestrator::{BatchReport, UploadOrchestrator};
pub use progress::{ProgressRegistry, ProgressSink, UploadId, UploadProgress, UploadStatus};
pub use transport::{FileTransport, HttpTransport, UploadSource};
