use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tubelift")]
#[command(author, version, about = "Telegram bot that downloads YouTube videos and sends them back to the chat", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Print video metadata without downloading
    Info {
        /// YouTube video URL
        url: String,

        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a video with the bot's size limit and keep the file
    Download {
        /// YouTube video URL
        url: String,

        /// Output directory (defaults to DOWNLOAD_FOLDER)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the installed yt-dlp version
    CheckYtdlp,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["tubelift"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_parse_info_and_download() {
        let cli = Cli::try_parse_from(["tubelift", "info", "https://youtu.be/dQw4w9WgXcQ", "--json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Info {
                url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
                json: true,
            })
        );

        let cli = Cli::try_parse_from(["tubelift", "download", "https://youtu.be/dQw4w9WgXcQ", "-o", "/tmp/out"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Download {
                url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
                output: Some(PathBuf::from("/tmp/out")),
            })
        );

        let cli = Cli::try_parse_from(["tubelift", "check-ytdlp"]).unwrap();
        assert_eq!(cli.command, Some(Commands::CheckYtdlp));
    }
}
