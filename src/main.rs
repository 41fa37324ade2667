use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use tubelift::cli::{Cli, Commands};
use tubelift::core::process::ToolDeadline;
use tubelift::core::rate_limiter::RateLimiter;
use tubelift::core::utils::format_megabytes;
use tubelift::core::validation::validate_youtube_url;
use tubelift::core::{config, init_logger, log_startup_configuration};
use tubelift::download::{Downloader, FileJanitor, MediaProbe, RequestPipeline, YtDlpTool};
use tubelift::telegram::{create_bot, schema, setup_bot_commands, ChatTransport, HandlerDeps, TeloxideTransport};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the chosen subcommand; without a
/// subcommand the bot is started.
///
/// # Errors
/// Returns an error if initialization fails (logging, missing token, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before any config is read
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot().await,
        Commands::Info { url, json } => run_info(&url, json).await,
        Commands::Download { url, output } => run_download(&url, output).await,
        Commands::CheckYtdlp => check_ytdlp().await,
    }
}

/// Cancels the returned token on Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl-C received, cancelling running yt-dlp calls");
            child.cancel();
        }
    });
    token
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");
    log_startup_configuration();

    let token = match config::bot_token() {
        Ok(token) => token,
        Err(e) => {
            log::error!("{}", e);
            return Err(e.into());
        }
    };

    tokio::fs::create_dir_all(config::DOWNLOAD_FOLDER.as_path()).await?;

    let tool = Arc::new(YtDlpTool::default());
    match tool.version(&ToolDeadline::after(config::download::version_timeout())).await {
        Ok(version) => log::info!("yt-dlp version: {}", version),
        Err(e) => log::warn!("yt-dlp check failed: {}. Continuing anyway.", e),
    }

    let bot = create_bot(&token)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let rate_limiter = Arc::new(RateLimiter::new());
    let _cleanup_task = Arc::clone(&rate_limiter).spawn_cleanup_task(config::rate_limit::sweep_interval());

    let shutdown = cancel_on_ctrl_c();
    let pipeline = RequestPipeline::new(rate_limiter, tool, config::DOWNLOAD_FOLDER.clone()).with_shutdown(shutdown.clone());
    let transport: Arc<dyn ChatTransport> = Arc::new(TeloxideTransport::new(bot.clone()));
    let deps = HandlerDeps::new(Arc::new(pipeline), transport);

    // Polling listener that drops updates queued while the bot was offline
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    log::info!("Bot is running and ready to receive messages");
    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    shutdown.cancel();
    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

async fn run_info(url: &str, json: bool) -> Result<()> {
    let url = validate_youtube_url(url)?;
    let probe = MediaProbe::new(Arc::new(YtDlpTool::default()));
    let deadline = ToolDeadline::new(*config::download::PROBE_TIMEOUT, cancel_on_ctrl_c());
    let meta = probe.probe(&url, &deadline).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meta)?);
    } else {
        println!("Title:    {}", meta.title);
        println!("Uploader: {}", meta.uploader);
        println!("Duration: {} seconds", meta.duration_secs);
        println!("Views:    {}", meta.view_count);
        if !meta.description.is_empty() {
            println!("\n{}", meta.description);
        }
    }
    Ok(())
}

async fn run_download(url: &str, output: Option<PathBuf>) -> Result<()> {
    let url = validate_youtube_url(url)?;
    let dir = output.unwrap_or_else(|| config::DOWNLOAD_FOLDER.clone());
    tokio::fs::create_dir_all(&dir).await?;

    let downloader = Downloader::new(
        Arc::new(YtDlpTool::default()),
        FileJanitor::new(dir),
        *config::download::DOWNLOAD_TIMEOUT,
    );
    let prefix = format!("cli_{}", Uuid::new_v4().simple());
    let artifact = downloader.try_fetch(&url, &prefix, &cancel_on_ctrl_c()).await?;

    println!(
        "{} ({}MB, {} quality)",
        artifact.path.display(),
        format_megabytes(artifact.size_bytes),
        artifact.tier.as_str()
    );
    Ok(())
}

async fn check_ytdlp() -> Result<()> {
    let tool = YtDlpTool::default();
    let version = tool
        .version(&ToolDeadline::after(config::download::version_timeout()))
        .await?;
    println!("{} {}", tool.bin(), version);
    Ok(())
}
