use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use uuid::Uuid;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

/// A finalized zip artifact on disk. The backing file is removed when the
/// guard is dropped, so whoever streams it out just keeps the guard alive
/// until the last byte is gone.
pub struct TempArchive {
    file: NamedTempFile,
    pub entry_count: usize,
    pub size_bytes: u64,
}

impl TempArchive {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for TempArchive {
    fn drop(&mut self) {
        tracing::debug!("🧹 Removing temporary archive {}", self.file.path().display());
    }
}

/// Bundles the whole storage directory into a single flat zip. Every request
/// gets its own uniquely named artifact, so concurrent bundle downloads never
/// touch each other's files.
pub struct ArchiveService {
    source_dir: PathBuf,
}

impl ArchiveService {
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Writes every stored file into a fresh temp archive and hands back the
    /// delete-on-drop guard. Entry writing runs on the blocking pool.
    pub async fn bundle_all(&self) -> Result<TempArchive> {
        let dir = self.source_dir.clone();
        tokio::task::spawn_blocking(move || build_archive(&dir))
            .await
            .context("archive task panicked")?
    }
}

fn build_archive(dir: &Path) -> Result<TempArchive> {
    let temp = tempfile::Builder::new()
        .prefix(&format!("files-{}-", Uuid::new_v4()))
        .suffix(".zip")
        .tempfile()
        .context("could not create temporary archive")?;
    tracing::debug!("📦 Opening temporary archive {}", temp.path().display());

    let writer = temp
        .as_file()
        .try_clone()
        .context("could not clone archive handle")?;
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entry_count = 0usize;
    let entries = std::fs::read_dir(dir).context("could not scan storage directory")?;
    for entry in entries {
        let entry = entry.context("could not scan storage directory")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };

        zip.start_file(&name, options)
            .with_context(|| format!("could not start archive entry {}", name))?;
        let mut source = File::open(&path).with_context(|| format!("could not read {}", name))?;
        io::copy(&mut source, &mut zip)
            .with_context(|| format!("could not compress {}", name))?;
        entry_count += 1;
        tracing::debug!("🗜️  Added {} to archive", name);
    }

    let mut inner = zip.finish().context("could not finalize archive")?;
    inner.flush().context("could not flush archive")?;

    let size_bytes = temp.as_file().metadata()?.len();
    Ok(TempArchive {
        file: temp,
        entry_count,
        size_bytes,
    })
}
