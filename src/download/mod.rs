//! Download management: metadata probe, tiered download, artifact cleanup
//! and the request pipeline tying them together.

pub mod downloader;
pub mod error;
pub mod janitor;
pub mod metadata;
pub mod pipeline;
pub mod source;
pub mod ytdlp_errors;

// Re-exports for convenience
pub use downloader::{DownloadedArtifact, Downloader, QualityTier};
pub use error::DownloadError;
pub use janitor::FileJanitor;
pub use metadata::{MediaProbe, VideoMetadata};
pub use pipeline::{Cleanup, DownloadRequest, PipelineFailure, PipelineOutcome, PipelineState, RequestPipeline};
pub use source::{MediaTool, YtDlpTool};
