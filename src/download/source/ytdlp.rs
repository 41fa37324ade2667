//! yt-dlp subprocess behind `MediaTool`.

use crate::core::config;
use crate::core::process::{run_with_deadline, ToolDeadline};
use crate::download::error::DownloadError;
use crate::download::source::{DownloadJob, MediaTool, RawVideoInfo};
use crate::download::ytdlp_errors::{analyze_ytdlp_error, error_label, stderr_summary};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use url::Url;

/// Media tool powered by the yt-dlp binary.
#[derive(Debug, Clone)]
pub struct YtDlpTool {
    bin: String,
}

impl Default for YtDlpTool {
    fn default() -> Self {
        Self::new(config::YTDL_BIN.as_str())
    }
}

impl YtDlpTool {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }

    fn metadata_args(url: &Url) -> Vec<String> {
        vec![
            "--dump-single-json".to_string(),
            "--skip-download".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            url.as_str().to_string(),
        ]
    }

    fn download_args(job: &DownloadJob) -> Vec<String> {
        vec![
            "--format".to_string(),
            job.format.clone(),
            "--output".to_string(),
            job.output_template(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--no-progress".to_string(),
            // Prints the final path once post-processing has moved the file
            "--print".to_string(),
            "after_move:filepath".to_string(),
            job.url.as_str().to_string(),
        ]
    }

    fn failure(&self, what: &str, url: &Url, stderr: &[u8]) -> DownloadError {
        let stderr = String::from_utf8_lossy(stderr);
        let error_type = analyze_ytdlp_error(&stderr);
        let summary = stderr_summary(&stderr);
        log::warn!(
            "{} {} failed for {} ({}): {}",
            self.bin,
            what,
            url,
            error_label(error_type),
            summary
        );
        DownloadError::YtDlp(summary)
    }

    /// Runs `yt-dlp --version`, returns the trimmed version string.
    pub async fn version(&self, deadline: &ToolDeadline) -> Result<String, DownloadError> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("--version");
        let output = run_with_deadline(&mut cmd, deadline).await?;
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || version.is_empty() {
            return Err(DownloadError::YtDlp(
                "--version produced no output, is yt-dlp installed?".to_string(),
            ));
        }
        Ok(version)
    }
}

/// Last non-empty stdout line, which `--print after_move:filepath` writes.
fn reported_path(stdout: &[u8]) -> Option<PathBuf> {
    String::from_utf8_lossy(stdout)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}

#[async_trait]
impl MediaTool for YtDlpTool {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn dump_metadata(&self, url: &Url, deadline: &ToolDeadline) -> Result<RawVideoInfo, DownloadError> {
        let args = Self::metadata_args(url);
        log::debug!("yt-dlp command for metadata: {} {}", self.bin, args.join(" "));

        let mut cmd = Command::new(&self.bin);
        cmd.args(&args);
        let output = run_with_deadline(&mut cmd, deadline).await?;

        if !output.status.success() {
            return Err(self.failure("metadata", url, &output.stderr));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn download(&self, job: &DownloadJob, deadline: &ToolDeadline) -> Result<Option<PathBuf>, DownloadError> {
        let args = Self::download_args(job);
        log::debug!("yt-dlp command for download: {} {}", self.bin, args.join(" "));

        let mut cmd = Command::new(&self.bin);
        cmd.args(&args);
        let output = run_with_deadline(&mut cmd, deadline).await?;

        if !output.status.success() {
            return Err(self.failure("download", &job.url, &output.stderr));
        }

        Ok(reported_path(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn job() -> DownloadJob {
        DownloadJob {
            url: Url::parse("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            output_dir: PathBuf::from("downloads"),
            stem: "7_req".to_string(),
            format: "best[filesize<45M]/best[height<=720]/best".to_string(),
        }
    }

    #[test]
    fn test_metadata_args_skip_download() {
        let url = Url::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let args = YtDlpTool::metadata_args(&url);
        assert!(args.contains(&"--dump-single-json".to_string()));
        assert!(args.contains(&"--skip-download".to_string()));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_download_args() {
        let args = YtDlpTool::download_args(&job());
        assert_eq!(
            args,
            vec![
                "--format",
                "best[filesize<45M]/best[height<=720]/best",
                "--output",
                "downloads/7_req.%(ext)s",
                "--no-playlist",
                "--no-warnings",
                "--no-progress",
                "--print",
                "after_move:filepath",
                "https://youtu.be/dQw4w9WgXcQ",
            ]
        );
    }

    #[test]
    fn test_reported_path() {
        assert_eq!(
            reported_path(b"downloads/7_req.mp4\n"),
            Some(PathBuf::from("downloads/7_req.mp4"))
        );
        assert_eq!(reported_path(b"\n  \n"), None);
    }

    #[tokio::test]
    async fn test_missing_binary_fails_cleanly() {
        let tool = YtDlpTool::new("definitely-not-yt-dlp-tubelift");
        let url = Url::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let result = tool
            .dump_metadata(&url, &ToolDeadline::after(std::time::Duration::from_secs(5)))
            .await;
        assert!(matches!(result, Err(DownloadError::Spawn(_))));
    }
}
