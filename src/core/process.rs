//! Process execution with a deadline and cancellation
//!
//! Every external tool call runs through `run_with_deadline`, so a stalled
//! yt-dlp never blocks a pipeline forever.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::download::error::DownloadError;

/// Time budget and cancellation handle for one external tool call.
#[derive(Debug, Clone)]
pub struct ToolDeadline {
    pub timeout: Duration,
    pub cancel: CancellationToken,
}

impl ToolDeadline {
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    /// Deadline that can only expire by timeout.
    pub fn after(timeout: Duration) -> Self {
        Self::new(timeout, CancellationToken::new())
    }
}

/// Run a Command until it exits, the timeout elapses or the token is cancelled.
///
/// The child is spawned with `kill_on_drop`, so losing the race kills it.
pub async fn run_with_deadline(cmd: &mut Command, deadline: &ToolDeadline) -> Result<Output, DownloadError> {
    cmd.kill_on_drop(true);
    let child = cmd.output();

    tokio::select! {
        result = tokio::time::timeout(deadline.timeout, child) => match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(DownloadError::Spawn(e)),
            Err(_) => Err(DownloadError::Timeout(deadline.timeout)),
        },
        _ = deadline.cancel.cancelled() => Err(DownloadError::Cancelled),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_collects_output() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo hello"]);
        let output = run_with_deadline(&mut cmd, &ToolDeadline::after(Duration::from_secs(5)))
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let result = run_with_deadline(&mut cmd, &ToolDeadline::after(Duration::from_millis(100))).await;
        assert!(matches!(result, Err(DownloadError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_run_honours_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let result = run_with_deadline(&mut cmd, &ToolDeadline::new(Duration::from_secs(10), token)).await;
        assert!(matches!(result, Err(DownloadError::Cancelled)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let mut cmd = Command::new("definitely-not-a-real-binary-tubelift");
        let result = run_with_deadline(&mut cmd, &ToolDeadline::after(Duration::from_secs(5))).await;
        assert!(matches!(result, Err(DownloadError::Spawn(_))));
    }
}
