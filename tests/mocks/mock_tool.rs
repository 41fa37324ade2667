//! Scripted media tool
//!
//! Metadata answers and download results are queued up front; each download
//! call consumes one step.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tubelift::core::process::ToolDeadline;
use tubelift::download::error::DownloadError;
use tubelift::download::source::{DownloadJob, MediaTool, RawVideoInfo};
use url::Url;

pub const MB: u64 = 1024 * 1024;

/// Result of one scripted download call
#[derive(Debug, Clone)]
pub enum DownloadStep {
    /// Writes `<stem>.mp4` with the given size in bytes
    File(u64),
    /// Exits successfully without producing a file
    NoFile,
    /// Leaves `<stem>.mp4.part` behind and fails
    FailWithPartial,
}

pub struct ScriptedTool {
    metadata: Option<RawVideoInfo>,
    steps: Mutex<VecDeque<DownloadStep>>,
    report_path: bool,
    metadata_calls: AtomicUsize,
    jobs: Mutex<Vec<DownloadJob>>,
}

impl ScriptedTool {
    /// Tool answering with `metadata` (or failing the probe when `None`)
    pub fn new(metadata: Option<RawVideoInfo>, steps: Vec<DownloadStep>) -> Self {
        Self {
            metadata,
            steps: Mutex::new(steps.into()),
            report_path: true,
            metadata_calls: AtomicUsize::new(0),
            jobs: Mutex::new(Vec::new()),
        }
    }

    /// Standard metadata of the examples: X by Y, 120 s, 5000 views
    pub fn sample_metadata() -> RawVideoInfo {
        RawVideoInfo {
            title: Some("X".to_string()),
            uploader: Some("Y".to_string()),
            duration: Some(120.0),
            view_count: Some(5000),
            description: Some("A test video".to_string()),
        }
    }

    /// Do not print the final path, forcing the downloader to search by stem
    pub fn without_reported_path(mut self) -> Self {
        self.report_path = false;
        self
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn jobs(&self) -> Vec<DownloadJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaTool for ScriptedTool {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn dump_metadata(&self, _url: &Url, _deadline: &ToolDeadline) -> Result<RawVideoInfo, DownloadError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.metadata
            .clone()
            .ok_or_else(|| DownloadError::YtDlp("ERROR: [youtube] Private video".to_string()))
    }

    async fn download(&self, job: &DownloadJob, _deadline: &ToolDeadline) -> Result<Option<PathBuf>, DownloadError> {
        self.jobs.lock().unwrap().push(job.clone());
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(DownloadStep::NoFile);

        match step {
            DownloadStep::File(size) => {
                let path = job.output_dir.join(format!("{}.mp4", job.stem));
                fs::File::create(&path)?.set_len(size)?;
                Ok(self.report_path.then_some(path))
            }
            DownloadStep::NoFile => Ok(None),
            DownloadStep::FailWithPartial => {
                let path = job.output_dir.join(format!("{}.mp4.part", job.stem));
                fs::write(&path, b"partial")?;
                Err(DownloadError::YtDlp("ERROR: unable to download video data: HTTP Error 403".to_string()))
            }
        }
    }
}
