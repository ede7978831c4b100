//! CLI module for SpeechClip
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// SpeechClip CLI
///
/// A command-line tool for speech-driven video clipping: transcribe with a
/// local Whisper model, attribute speakers, let an LLM pick the highlights,
/// and cut them with ffmpeg.
#[derive(Parser)]
#[command(name = "speechclip")]
#[command(about = "SpeechClip - speech-driven video clipping")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe a media file, optionally attributing speakers
    Recognize(args::RecognizeArgs),
    /// Ask an LLM to analyze a transcript
    Analyze(args::AnalyzeArgs),
    /// Cut clips from a plan or an explicit time range
    Clip(args::ClipArgs),
    /// Export a transcript as SRT or JSON
    Export(args::ExportArgs),
    /// Inspect media file information
    Inspect(args::InspectArgs),
    /// Run recognize, analyze, and clip in one pass
    Pipeline(args::PipelineArgs),
}
