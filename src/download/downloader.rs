//! Tiered video download with a hard size ceiling.
//!
//! The primary tier asks yt-dlp for the best quality that fits; if the file
//! still lands over the ceiling it is deleted and exactly one degraded tier is
//! attempted. Nothing larger than the ceiling is ever returned.

use crate::core::config::limits;
use crate::core::process::ToolDeadline;
use crate::download::error::DownloadError;
use crate::download::janitor::FileJanitor;
use crate::download::source::{DownloadJob, MediaTool};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Suffixes of files yt-dlp is still writing
const PARTIAL_SUFFIXES: &[&str] = &["part", "ytdl", "temp"];

/// Download attempt profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    /// Best quality under the ceiling, then <=720p, then anything
    Primary,
    /// Worst quality under 40 MB, then <=480p, then anything
    Degraded,
}

impl QualityTier {
    /// Ordered format preference handed to yt-dlp
    pub fn format(self) -> String {
        match self {
            QualityTier::Primary => format!(
                "best[filesize<{}M]/best[height<=720]/best",
                limits::MAX_FILE_SIZE_MB
            ),
            QualityTier::Degraded => format!(
                "worst[filesize<{}M]/worst[height<=480]/worst",
                limits::DEGRADED_TARGET_MB
            ),
        }
    }

    /// File stem for this tier under a request prefix
    pub fn stem(self, prefix: &str) -> String {
        match self {
            QualityTier::Primary => prefix.to_string(),
            QualityTier::Degraded => format!("{}_low", prefix),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Primary => "primary",
            QualityTier::Degraded => "degraded",
        }
    }
}

/// A file that landed in the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub tier: QualityTier,
}

#[derive(Clone)]
pub struct Downloader {
    tool: Arc<dyn MediaTool>,
    janitor: FileJanitor,
    max_size: u64,
    timeout: Duration,
}

impl Downloader {
    /// Downloader writing into the janitor's directory, with the 45 MB ceiling.
    pub fn new(tool: Arc<dyn MediaTool>, janitor: FileJanitor, timeout: Duration) -> Self {
        Self {
            tool,
            janitor,
            max_size: limits::max_file_size_bytes(),
            timeout,
        }
    }

    pub fn dir(&self) -> &Path {
        self.janitor.dir()
    }

    /// Downloads the video, degrading once if the primary file is too large.
    ///
    /// Files of a failed attempt are not cleaned up here, the caller sweeps
    /// the request prefix.
    pub async fn try_fetch(
        &self,
        url: &Url,
        prefix: &str,
        cancel: &CancellationToken,
    ) -> Result<DownloadedArtifact, DownloadError> {
        let primary = self.attempt(url, prefix, QualityTier::Primary, cancel).await?;
        if primary.size_bytes <= self.max_size {
            return Ok(primary);
        }

        log::warn!(
            "Primary download is {} bytes, over the {} byte limit; retrying with degraded quality",
            primary.size_bytes,
            self.max_size
        );
        self.janitor.remove(&primary.path).await;

        let degraded = self.attempt(url, prefix, QualityTier::Degraded, cancel).await?;
        if degraded.size_bytes <= self.max_size {
            return Ok(degraded);
        }

        log::warn!(
            "Degraded download is still {} bytes, giving up",
            degraded.size_bytes
        );
        self.janitor.remove(&degraded.path).await;
        Err(DownloadError::TooLarge {
            size: degraded.size_bytes,
            limit: self.max_size,
        })
    }

    /// Same as `try_fetch`, logging the failure and returning `None`.
    pub async fn fetch(&self, url: &Url, prefix: &str, cancel: &CancellationToken) -> Option<DownloadedArtifact> {
        match self.try_fetch(url, prefix, cancel).await {
            Ok(artifact) => {
                log::info!(
                    "Downloaded {} ({} bytes, {} tier)",
                    artifact.path.display(),
                    artifact.size_bytes,
                    artifact.tier.as_str()
                );
                Some(artifact)
            }
            Err(e) => {
                log::error!("Download failed for {} [{}]: {}", url, e.subcategory(), e);
                None
            }
        }
    }

    async fn attempt(
        &self,
        url: &Url,
        prefix: &str,
        tier: QualityTier,
        cancel: &CancellationToken,
    ) -> Result<DownloadedArtifact, DownloadError> {
        let job = DownloadJob {
            url: url.clone(),
            output_dir: self.dir().to_path_buf(),
            stem: tier.stem(prefix),
            format: tier.format(),
        };
        log::info!("Starting {} tier download of {} as {}", tier.as_str(), url, job.stem);

        let deadline = ToolDeadline::new(self.timeout, cancel.child_token());
        let reported = self.tool.download(&job, &deadline).await?;

        let path = match reported.filter(|p| p.is_file()) {
            Some(path) => path,
            None => locate_by_stem(self.dir(), &job.stem)
                .await?
                .ok_or_else(|| DownloadError::FileNotFound(job.stem.clone()))?,
        };

        let size_bytes = tokio::fs::metadata(&path).await?.len();
        Ok(DownloadedArtifact { path, size_bytes, tier })
    }
}

fn is_partial(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| PARTIAL_SUFFIXES.contains(&ext))
        .unwrap_or(false)
}

/// Finds the finished file named `<stem>.<ext>` in `dir`.
async fn locate_by_stem(dir: &Path, stem: &str) -> Result<Option<PathBuf>, DownloadError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_partial(&path) || !path.is_file() {
            continue;
        }
        if path.file_stem().and_then(|s| s.to_str()) == Some(stem) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
