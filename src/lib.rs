//! Tubelift - Telegram bot that downloads YouTube videos with yt-dlp
//!
//! A chat message carrying a YouTube link is validated, rate limited per user,
//! probed for metadata, downloaded under a 45 MB ceiling (with one degraded
//! retry), uploaded back to the chat and always cleaned up.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, rate limiting, URL validation
//! - `download`: yt-dlp integration, tiered downloader, cleanup and the request pipeline
//! - `telegram`: Bot setup, handler tree and the chat transport

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use download::{DownloadRequest, PipelineOutcome, RequestPipeline};
pub use telegram::{ChatTransport, TeloxideTransport};
