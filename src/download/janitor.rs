//! Removal of transient artifacts from the working directory.
//!
//! Every removal is idempotent: a file that is already gone counts as removed
//! and is never reported as an error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileJanitor {
    dir: PathBuf,
}

impl FileJanitor {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deletes one artifact.
    ///
    /// Returns true when the file is gone afterwards (deleted now or already
    /// missing). Other I/O errors are logged and reported as false.
    pub async fn remove(&self, path: &Path) -> bool {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                log::info!("Removed file: {}", path.display());
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("File already gone: {}", path.display());
                true
            }
            Err(e) => {
                log::error!("Failed to remove {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Deletes every file in the working directory whose name starts with
    /// `prefix`, including partial downloads. Returns the number removed.
    pub async fn sweep_prefix(&self, prefix: &str) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                log::error!("Cleanup sweep could not read {}: {}", self.dir.display(), e);
                return 0;
            }
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    log::error!("Cleanup sweep stopped in {}: {}", self.dir.display(), e);
                    break;
                }
            };

            let name = entry.file_name();
            if !name.to_string_lossy().starts_with(prefix) {
                continue;
            }
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file && self.remove(&entry.path()).await {
                removed += 1;
            }
        }

        if removed > 0 {
            log::info!("Cleanup sweep removed {} file(s) for prefix {}", removed, prefix);
        }
        removed
    }
}
