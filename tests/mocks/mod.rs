//! Test doubles for the pipeline seams
//!
//! - `ScriptedTool` stands in for yt-dlp and writes sparse files of scripted sizes
//! - `RecordingTransport` stands in for the Bot API and records every call

pub mod mock_tool;
pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_tool::{DownloadStep, ScriptedTool};
#[allow(unused_imports)]
pub use mock_transport::{RecordingTransport, Sent};
