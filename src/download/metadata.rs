//! Video metadata probing.
//!
//! Asks the media tool for metadata only (no file is fetched) and normalizes
//! the result into `VideoMetadata`. Failures never propagate: the caller gets
//! `None` and tells the user the video info could not be retrieved.

use crate::core::process::ToolDeadline;
use crate::core::utils::truncate_with_ellipsis;
use crate::download::error::DownloadError;
use crate::download::source::{MediaTool, RawVideoInfo};
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// Description length shown to users, in characters
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Placeholder for missing text fields
pub const UNKNOWN: &str = "Unknown";

/// Normalized video metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub uploader: String,
    pub duration_secs: u64,
    pub view_count: u64,
    /// Already truncated to `DESCRIPTION_MAX_CHARS`
    pub description: String,
}

fn text_or_unknown(value: Option<String>) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

impl From<RawVideoInfo> for VideoMetadata {
    fn from(raw: RawVideoInfo) -> Self {
        let duration_secs = raw
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d.round() as u64)
            .unwrap_or(0);

        Self {
            title: text_or_unknown(raw.title),
            uploader: text_or_unknown(raw.uploader),
            duration_secs,
            view_count: raw.view_count.unwrap_or(0),
            description: truncate_with_ellipsis(raw.description.as_deref().unwrap_or(""), DESCRIPTION_MAX_CHARS),
        }
    }
}

/// Metadata-only front end over a `MediaTool`.
#[derive(Clone)]
pub struct MediaProbe {
    tool: Arc<dyn MediaTool>,
}

impl MediaProbe {
    pub fn new(tool: Arc<dyn MediaTool>) -> Self {
        Self { tool }
    }

    /// Fetches metadata, returning the error for callers that want it (CLI).
    pub async fn probe(&self, url: &Url, deadline: &ToolDeadline) -> Result<VideoMetadata, DownloadError> {
        let raw = self.tool.dump_metadata(url, deadline).await?;
        Ok(VideoMetadata::from(raw))
    }

    /// Fetches metadata, logging and swallowing any failure.
    pub async fn fetch_metadata(&self, url: &Url, deadline: &ToolDeadline) -> Option<VideoMetadata> {
        match self.probe(url, deadline).await {
            Ok(meta) => {
                log::info!(
                    "Got metadata from {}: title='{}', uploader='{}', duration={}s",
                    self.tool.name(),
                    meta.title,
                    meta.uploader,
                    meta.duration_secs
                );
                Some(meta)
            }
            Err(e) => {
                log::error!("Failed to get video info for {} [{}]: {}", url, e.subcategory(), e);
                None
            }
        }
    }
}
