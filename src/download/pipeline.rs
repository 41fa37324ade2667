//! Request pipeline orchestrator.
//!
//! Drives one chat message through
//!   classify → rate check → probe → tiered download → size re-check → upload → cleanup
//! and maps every failure to a user-facing message. Each terminal outcome
//! records exactly one cleanup action, so no request leaves files behind.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use teloxide::types::{ChatAction, ChatId, UserId};
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

use crate::core::config::{self, limits};
use crate::core::error::AppResult;
use crate::core::process::ToolDeadline;
use crate::core::rate_limiter::RateLimiter;
use crate::core::utils::truncate_with_ellipsis;
use crate::core::validation::validate_youtube_url;
use crate::download::downloader::Downloader;
use crate::download::janitor::FileJanitor;
use crate::download::metadata::MediaProbe;
use crate::download::source::MediaTool;
use crate::telegram::messages;
use crate::telegram::transport::{ChatTransport, VideoUpload};

/// Telegram caps captions at 1024 characters
const CAPTION_TITLE_MAX_CHARS: usize = 900;

/// One inbound text message to be processed.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Raw message text, not yet validated
    pub source_url: String,
    pub requester: UserId,
    pub conversation: ChatId,
    pub submitted_at: Instant,
    /// Unique per request, scopes the files this request writes
    pub request_id: Uuid,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>, requester: UserId, conversation: ChatId) -> Self {
        Self {
            source_url: source_url.into(),
            requester,
            conversation,
            submitted_at: Instant::now(),
            request_id: Uuid::new_v4(),
        }
    }

    /// File name prefix of every artifact of this request: `{chat_id}_{request_id}`
    pub fn prefix(&self) -> String {
        format!("{}_{}", self.conversation.0, self.request_id.simple())
    }
}

/// Why a request ended without delivering a video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineFailure {
    InvalidInput,
    RateLimited,
    ProbeFailure,
    DownloadFailure,
    TooLarge,
    /// Transport or I/O error caught at the pipeline boundary
    Unexpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Classifying,
    RateChecking,
    Probing,
    Downloading,
    SizeChecking,
    Uploading,
    Done,
    Failed(PipelineFailure),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Failed(reason) => write!(f, "Failed({:?})", reason),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Cleanup action taken on the way to a terminal state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// No artifact could exist yet
    NotNeeded,
    /// The single artifact was removed
    Removed(PathBuf),
    /// The request prefix was swept; holds the number of files deleted
    Swept(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Always `Done` or `Failed(_)`
    pub state: PipelineState,
    pub cleanup: Cleanup,
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        self.state == PipelineState::Done
    }

    pub fn failure(&self) -> Option<PipelineFailure> {
        match self.state {
            PipelineState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

pub struct RequestPipeline {
    limiter: Arc<RateLimiter>,
    probe: MediaProbe,
    downloader: Downloader,
    janitor: FileJanitor,
    probe_timeout: Duration,
    /// Ceiling for the re-check before upload
    size_ceiling: u64,
    shutdown: CancellationToken,
}

impl RequestPipeline {
    /// Pipeline writing into `dir`, with timeouts from the environment.
    pub fn new(limiter: Arc<RateLimiter>, tool: Arc<dyn MediaTool>, dir: impl Into<PathBuf>) -> Self {
        let janitor = FileJanitor::new(dir);
        Self {
            limiter,
            probe: MediaProbe::new(Arc::clone(&tool)),
            downloader: Downloader::new(tool, janitor.clone(), *config::download::DOWNLOAD_TIMEOUT),
            janitor,
            probe_timeout: *config::download::PROBE_TIMEOUT,
            size_ceiling: limits::max_file_size_bytes(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Tool calls are cancelled once `token` is cancelled.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Overrides the ceiling checked right before upload. The downloader
    /// keeps its own 45 MB limit.
    pub fn with_size_ceiling(mut self, size_ceiling: u64) -> Self {
        self.size_ceiling = size_ceiling;
        self
    }

    pub fn janitor(&self) -> &FileJanitor {
        &self.janitor
    }

    /// Processes one request to a terminal state. Never panics or returns an
    /// error: failures are reported to the chat and to the log.
    pub async fn handle(&self, transport: &dyn ChatTransport, request: &DownloadRequest) -> PipelineOutcome {
        let chat_id = request.conversation;
        self.enter(request, PipelineState::Idle);

        self.enter(request, PipelineState::Classifying);
        let url = match validate_youtube_url(&request.source_url) {
            Ok(url) => url,
            Err(e) => {
                log::info!("Rejected message from user {}: {}", request.requester, e);
                self.notify(transport, chat_id, messages::INVALID_URL).await;
                return self.finish(request, PipelineFailure::InvalidInput, Cleanup::NotNeeded);
            }
        };

        self.enter(request, PipelineState::RateChecking);
        if !self.limiter.check_and_record(request.requester, request.submitted_at) {
            let remaining = self.limiter.remaining(request.requester, request.submitted_at);
            log::info!("User {} is rate limited ({:?} left)", request.requester, remaining);
            let text = messages::rate_limited(self.limiter.cooldown(), remaining);
            self.notify(transport, chat_id, &text).await;
            return self.finish(request, PipelineFailure::RateLimited, Cleanup::NotNeeded);
        }

        match self.process(transport, request, &url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!(
                    "Error processing {} for chat {} [{}]: {}",
                    url,
                    chat_id,
                    request.prefix(),
                    e
                );
                self.notify(transport, chat_id, messages::GENERIC_ERROR).await;
                let swept = self.janitor.sweep_prefix(&request.prefix()).await;
                self.finish(request, PipelineFailure::Unexpected, Cleanup::Swept(swept))
            }
        }
    }

    async fn process(
        &self,
        transport: &dyn ChatTransport,
        request: &DownloadRequest,
        url: &Url,
    ) -> AppResult<PipelineOutcome> {
        let chat_id = request.conversation;
        let prefix = request.prefix();

        self.enter(request, PipelineState::Probing);
        self.chat_action(transport, chat_id, ChatAction::Typing).await;
        transport.send_message(chat_id, messages::CHECKING_INFO).await?;

        let deadline = ToolDeadline::new(self.probe_timeout, self.shutdown.child_token());
        let Some(meta) = self.probe.fetch_metadata(url, &deadline).await else {
            self.notify(transport, chat_id, messages::INFO_UNAVAILABLE).await;
            return Ok(self.finish(request, PipelineFailure::ProbeFailure, Cleanup::NotNeeded));
        };
        transport.send_message(chat_id, &messages::video_info(&meta)).await?;

        self.enter(request, PipelineState::Downloading);
        transport.send_message(chat_id, messages::DOWNLOAD_STARTED).await?;
        self.chat_action(transport, chat_id, ChatAction::UploadVideo).await;

        let Some(artifact) = self.downloader.fetch(url, &prefix, &self.shutdown).await else {
            self.notify(transport, chat_id, messages::DOWNLOAD_FAILED).await;
            let swept = self.janitor.sweep_prefix(&prefix).await;
            return Ok(self.finish(request, PipelineFailure::DownloadFailure, Cleanup::Swept(swept)));
        };

        self.enter(request, PipelineState::SizeChecking);
        let size = tokio::fs::metadata(&artifact.path).await?.len();
        if size > self.size_ceiling {
            log::warn!(
                "{} is {} bytes after download, over the {} byte limit",
                artifact.path.display(),
                size,
                self.size_ceiling
            );
            self.notify(transport, chat_id, &messages::too_large(size)).await;
            let cleanup = release_artifact(&self.janitor, artifact.path, &prefix).await;
            return Ok(self.finish(request, PipelineFailure::TooLarge, cleanup));
        }

        self.enter(request, PipelineState::Uploading);
        transport.send_message(chat_id, &messages::uploading(size)).await?;
        let title = truncate_with_ellipsis(&meta.title, CAPTION_TITLE_MAX_CHARS);
        let upload = VideoUpload {
            caption: messages::video_caption(&title, size),
            supports_streaming: true,
        };
        transport.send_video(chat_id, &artifact.path, upload).await?;
        transport.send_message(chat_id, messages::VIDEO_SENT).await?;

        let cleanup = release_artifact(&self.janitor, artifact.path, &prefix).await;
        self.enter(request, PipelineState::Done);
        log::info!("Delivered {} to chat {} ({} bytes)", url, chat_id, size);
        Ok(PipelineOutcome {
            state: PipelineState::Done,
            cleanup,
        })
    }

    fn enter(&self, request: &DownloadRequest, state: PipelineState) {
        log::debug!("[{}] -> {}", request.prefix(), state);
    }

    fn finish(&self, request: &DownloadRequest, reason: PipelineFailure, cleanup: Cleanup) -> PipelineOutcome {
        let state = PipelineState::Failed(reason);
        self.enter(request, state);
        PipelineOutcome { state, cleanup }
    }

    /// Sends a failure notice; its own failure is only logged.
    async fn notify(&self, transport: &dyn ChatTransport, chat_id: ChatId, text: &str) {
        if let Err(e) = transport.send_message(chat_id, text).await {
            log::error!("Failed to send message to chat {}: {}", chat_id, e);
        }
    }

    async fn chat_action(&self, transport: &dyn ChatTransport, chat_id: ChatId, action: ChatAction) {
        if let Err(e) = transport.send_chat_action(chat_id, action).await {
            log::warn!("Failed to send chat action to chat {}: {}", chat_id, e);
        }
    }
}

/// Removes the artifact; if that fails the whole request prefix is swept.
async fn release_artifact(janitor: &FileJanitor, path: PathBuf, prefix: &str) -> Cleanup {
    if janitor.remove(&path).await {
        Cleanup::Removed(path)
    } else {
        Cleanup::Swept(janitor.sweep_prefix(prefix).await)
    }
}
