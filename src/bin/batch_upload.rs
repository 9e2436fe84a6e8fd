use clap::Parser;
use dotenvy::dotenv;
use image_upload_backend::client::{HttpTransport, UploadOrchestrator, UploadSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Upload a batch of images to the backend", long_about = None)]
struct Args {
    /// Base URL of the backend
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,

    /// How many uploads run at the same time
    #[arg(short, long, default_value_t = 3)]
    concurrency: usize,

    /// Files to upload
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batch_upload=info,image_upload_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let sources: Vec<UploadSource> = args.files.iter().map(UploadSource::from_path).collect();
    info!("🚀 Uploading {} file(s) to {}", sources.len(), args.server);

    let transport = Arc::new(HttpTransport::new(&args.server)?);
    let orchestrator = UploadOrchestrator::new(transport, args.concurrency);

    let progress = orchestrator.progress();
    let printer = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(500));
        loop {
            ticker.tick().await;
            let snapshot = progress.snapshot();
            if snapshot.is_empty() {
                continue;
            }
            let line = snapshot
                .iter()
                .map(|(_, slot)| format!("{} {}%", slot.file_name, slot.percentage))
                .collect::<Vec<_>>()
                .join(" | ");
            info!("⏳ {}", line);
        }
    });

    let report = orchestrator.run_batch(sources).await;
    printer.abort();

    for message in &report.messages {
        info!("{}", message);
    }
    if report.failed > 0 {
        warn!("⚠️  {} upload(s) failed", report.failed);
    }

    info!("🗂️  Server now holds {} file(s):", report.listing.len());
    for file in &report.listing {
        info!("   {} ({} KB) -> {}", file.name, file.size, file.url);
    }

    Ok(())
}
