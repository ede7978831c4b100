//! SpeechClip CLI
//!
//! A command-line tool for speech-driven video clipping: transcribe with a
//! local Whisper model, attribute speakers, let an LLM pick the highlights,
//! and cut them with ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! speechclip recognize --input talk.mp4 --diarize --srt talk.srt --json talk.json
//! speechclip analyze --transcript talk.json --task smart-clip --plan talk_plan.json
//! speechclip clip --input talk.mp4 --plan talk_plan.json --quality high --concat
//! speechclip pipeline --input talk.mp4 --diarize
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use speechclip_cli::cli::{commands, Cli, Commands};
use speechclip_cli::config::Config;

/// Main entry point for the SpeechClip CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the --log-level flag
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting SpeechClip CLI");

    // Load configuration
    let config =
        Config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    // Execute the requested command
    match cli.command {
        Commands::Recognize(args) => {
            info!("Executing recognize command");
            commands::recognize(config, args).await?;
        }
        Commands::Analyze(args) => {
            info!("Executing analyze command");
            commands::analyze(config, args).await?;
        }
        Commands::Clip(args) => {
            info!("Executing clip command");
            commands::clip(config, args).await?;
        }
        Commands::Export(args) => {
            info!("Executing export command");
            commands::export(config, args).await?;
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(config, args).await?;
        }
        Commands::Pipeline(args) => {
            info!("Executing pipeline command");
            commands::pipeline(config, args).await?;
        }
    }

    info!("SpeechClip CLI completed successfully");
    Ok(())
}
