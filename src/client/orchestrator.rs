use std::sync::Arc;

use futures::{StreamExt, stream};
use tracing::{info, warn};

use super::progress::{ProgressRegistry, SlotSink, UploadId};
use super::transport::{FileTransport, UploadSource};
use crate::api::handlers::files::types::FileInfoResponse;

/// What one finished batch looked like: a message per file plus the listing
/// fetched after everything settled.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub messages: Vec<String>,
    pub succeeded: usize,
    pub failed: usize,
    pub listing: Vec<FileInfoResponse>,
}

/// Runs upload batches with bounded concurrency. One failed file never stops
/// the others, and the server listing is refreshed exactly once per batch,
/// only after every upload has settled.
pub struct UploadOrchestrator {
    transport: Arc<dyn FileTransport>,
    progress: Arc<ProgressRegistry>,
    concurrency: usize,
}

impl UploadOrchestrator {
    pub fn new(transport: Arc<dyn FileTransport>, concurrency: usize) -> Self {
        Self {
            transport,
            progress: Arc::new(ProgressRegistry::new()),
            concurrency: concurrency.max(1),
        }
    }

    pub fn progress(&self) -> Arc<ProgressRegistry> {
        self.progress.clone()
    }

    pub async fn run_batch(&self, sources: Vec<UploadSource>) -> BatchReport {
        // A new batch owns the registry outright.
        self.progress.clear();
        for (index, source) in sources.iter().enumerate() {
            self.progress.register(UploadId(index), &source.file_name);
        }

        let results: Vec<_> = stream::iter(sources.into_iter().enumerate().map(
            |(index, source)| {
                let id = UploadId(index);
                let transport = self.transport.clone();
                let sink = Arc::new(SlotSink::new(self.progress.clone(), id));
                async move {
                    let outcome = transport.upload_file(&source, sink).await;
                    (id, source.file_name, outcome)
                }
            },
        ))
        .buffer_unordered(self.concurrency)
        .collect()
        .await;

        let mut report = BatchReport::default();
        for (id, file_name, outcome) in results {
            match outcome {
                Ok(_) => {
                    self.progress.mark_succeeded(id);
                    report.succeeded += 1;
                    // Both outcome messages name the file the user selected,
                    // not whatever the server stored it as.
                    report
                        .messages
                        .push(format!("Uploaded the image successfully: {}", file_name));
                }
                Err(e) => {
                    self.progress.mark_failed(id);
                    report.failed += 1;
                    warn!("Upload failed for {}: {:#}", file_name, e);
                    report
                        .messages
                        .push(format!("Could not upload the image: {}", file_name));
                }
            }
        }

        match self.transport.fetch_listing().await {
            Ok(listing) => report.listing = listing,
            Err(e) => warn!("Could not refresh the listing after batch: {:#}", e),
        }

        info!(
            "📋 Batch finished: {} uploaded, {} failed",
            report.succeeded, report.failed
        );
        report
    }
}
