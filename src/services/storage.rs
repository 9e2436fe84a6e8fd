use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// One entry in the storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub name: String,
    pub size_bytes: u64,
}

/// Per-entry result of a delete-all sweep.
#[derive(Debug, Default)]
pub struct DeleteAllOutcome {
    pub deleted: Vec<String>,
    /// Entries that could not be removed, with the reason.
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("invalid file name: {0}")]
    InvalidKey(String),

    #[error("storage directory unreadable: {0}")]
    Unreadable(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Streams a payload into the store under `name`, replacing any existing
    /// file of that name. Returns the number of bytes written.
    async fn save_stream<'a>(
        &self,
        name: &str,
        reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<u64, StorageError>;

    /// Opens a stored file for reading, returning the handle and its length.
    async fn open_read(&self, name: &str) -> Result<(fs::File, u64), StorageError>;

    /// Enumerates every file in the store, in directory order.
    async fn list_files(&self) -> Result<Vec<StoredObject>, StorageError>;

    async fn delete_file(&self, name: &str) -> Result<(), StorageError>;

    /// Removes every file, collecting per-entry outcomes instead of stopping
    /// at the first failure.
    async fn delete_all_files(&self) -> Result<DeleteAllOutcome, StorageError>;
}

/// Flat-directory store. The directory listing is the source of truth: file
/// name is the only key and there is no index beside the filesystem. Writes
/// to the same name are last-write-wins; no locking is performed.
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolves a key to a path inside the root, rejecting anything that
    /// could address an entry outside the flat directory.
    fn object_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        let is_plain_component = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains('/')
            && !name.contains('\\')
            && Path::new(name).file_name().is_some_and(|f| f == name);

        if !is_plain_component {
            return Err(StorageError::InvalidKey(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn save_stream<'a>(
        &self,
        name: &str,
        mut reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<u64, StorageError> {
        let path = self.object_path(name)?;
        let mut file = fs::File::create(&path).await?;
        let bytes_written = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;
        Ok(bytes_written)
    }

    async fn open_read(&self, name: &str) -> Result<(fs::File, u64), StorageError> {
        let path = self.object_path(name)?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;
        let len = file.metadata().await?.len();
        Ok((file, len))
    }

    async fn list_files(&self) -> Result<Vec<StoredObject>, StorageError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(StorageError::Unreadable)?;

        let mut objects = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(StorageError::Unreadable)?
        {
            let metadata = entry.metadata().await.map_err(StorageError::Unreadable)?;
            if !metadata.is_file() {
                continue;
            }
            // Non-UTF-8 names cannot be addressed over the API
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            objects.push(StoredObject {
                name,
                size_bytes: metadata.len(),
            });
        }

        Ok(objects)
    }

    async fn delete_file(&self, name: &str) -> Result<(), StorageError> {
        let path = self.object_path(name)?;
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }

    async fn delete_all_files(&self) -> Result<DeleteAllOutcome, StorageError> {
        let listing = self.list_files().await?;

        let mut outcome = DeleteAllOutcome::default();
        for object in listing {
            // Names come straight from read_dir, so they are plain components
            match fs::remove_file(self.root.join(&object.name)).await {
                Ok(()) => outcome.deleted.push(object.name),
                Err(e) => {
                    tracing::warn!("Could not delete {}: {}", object.name, e);
                    outcome.failed.push((object.name, e.to_string()));
                }
            }
        }

        Ok(outcome)
    }
}
