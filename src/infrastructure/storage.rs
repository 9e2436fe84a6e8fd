use crate::config::AppConfig;
use crate::services::storage::{LocalStorageService, StorageService};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> Result<Arc<dyn StorageService>> {
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "could not create upload directory {}",
                config.upload_dir.display()
            )
        })?;

    info!("🗂️  Local storage ready at {}", config.upload_dir.display());
    Ok(Arc::new(LocalStorageService::new(config.upload_dir.clone())))
}
