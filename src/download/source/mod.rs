//! External media tool abstraction.
//!
//! The probe and the downloader talk to yt-dlp only through the `MediaTool`
//! trait, so the pipeline can be exercised against a scripted tool in tests.
//!
//! Built-in backend:
//! - `YtDlpTool`: yt-dlp subprocess

pub mod ytdlp;

use crate::core::process::ToolDeadline;
use crate::download::error::DownloadError;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

pub use ytdlp::YtDlpTool;

/// Subset of yt-dlp's info JSON the bot uses. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawVideoInfo {
    pub title: Option<String>,
    /// Seconds, yt-dlp reports it as a float for some extractors
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    pub view_count: Option<u64>,
    pub description: Option<String>,
}

/// One download attempt handed to the tool.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// Validated video URL
    pub url: Url,
    /// Working directory the file must land in
    pub output_dir: PathBuf,
    /// Unique file stem assigned by the caller; the tool only adds the extension
    pub stem: String,
    /// Ordered format preference, evaluated by the tool itself
    pub format: String,
}

impl DownloadJob {
    /// yt-dlp output template: `<dir>/<stem>.%(ext)s`
    pub fn output_template(&self) -> String {
        self.output_dir
            .join(format!("{}.%(ext)s", self.stem))
            .to_string_lossy()
            .into_owned()
    }
}

/// Interface to the external media tool.
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Human-readable name of this tool (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Metadata-only query, must not download the media.
    async fn dump_metadata(&self, url: &Url, deadline: &ToolDeadline) -> Result<RawVideoInfo, DownloadError>;

    /// Runs one download attempt.
    ///
    /// Returns the final file path when the tool reports it; `None` means the
    /// caller has to locate the file by the job's stem.
    async fn download(&self, job: &DownloadJob, deadline: &ToolDeadline) -> Result<Option<PathBuf>, DownloadError>;
}
