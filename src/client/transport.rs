use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Url};
use tokio_util::io::ReaderStream;

use super::progress::ProgressSink;
use crate::api::handlers::files::types::{FileInfoResponse, UploadResponse};

/// A local file queued for upload.
#[derive(Debug, Clone)]
pub struct UploadSource {
    pub path: PathBuf,
    pub file_name: String,
}

impl UploadSource {
    /// Derives the multipart file name from the path's last component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());
        Self { path, file_name }
    }
}

/// How a batch reaches the server. Swapped for a mock in tests.
#[async_trait]
pub trait FileTransport: Send + Sync {
    async fn upload_file(
        &self,
        source: &UploadSource,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<UploadResponse>;

    async fn fetch_listing(&self) -> Result<Vec<FileInfoResponse>>;
}

/// Talks to the backend over HTTP using streamed multipart uploads.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        // A missing trailing slash would make Url::join eat the last segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let parsed =
            Url::parse(&normalized).with_context(|| format!("invalid server url: {}", base_url))?;
        Ok(Self {
            http: Client::new(),
            base_url: parsed,
        })
    }
}

#[async_trait]
impl FileTransport for HttpTransport {
    async fn upload_file(
        &self,
        source: &UploadSource,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<UploadResponse> {
        let file = tokio::fs::File::open(&source.path)
            .await
            .with_context(|| format!("could not open {}", source.path.display()))?;
        let total = file.metadata().await?.len();

        let stream = progress_stream(ReaderStream::new(file), total, progress);
        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(source.file_name.clone());
        let form = Form::new().part("file", part);

        let url = self.base_url.join("upload")?;
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn fetch_listing(&self) -> Result<Vec<FileInfoResponse>> {
        let url = self.base_url.join("files")?;
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Wraps a byte stream so every chunk reports cumulative progress.
fn progress_stream(
    mut reader: ReaderStream<tokio::fs::File>,
    total: u64,
    sink: Arc<dyn ProgressSink>,
) -> impl Stream<Item = std::io::Result<bytes::Bytes>> {
    async_stream::stream! {
        let mut transferred: u64 = 0;
        while let Some(chunk) = reader.next().await {
            match chunk {
                Ok(bytes) => {
                    transferred += bytes.len() as u64;
                    sink.on_progress(transferred, total);
                    yield Ok(bytes);
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    }
}
