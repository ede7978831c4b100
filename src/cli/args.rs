//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the recognize command
#[derive(Args, Debug)]
pub struct RecognizeArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Attribute sentences to speakers
    #[arg(long)]
    pub diarize: bool,

    /// Hotword biasing recognition (repeatable)
    #[arg(long = "hotword")]
    pub hotwords: Vec<String>,

    /// Recognition language code (overrides config)
    #[arg(long)]
    pub language: Option<String>,

    /// Loudness-normalize audio before recognition
    #[arg(long)]
    pub normalize: bool,

    /// Trim leading/trailing silence before recognition
    #[arg(long)]
    pub trim_silence: bool,

    /// Write subtitles to this SRT file
    #[arg(long)]
    pub srt: Option<PathBuf>,

    /// Write the transcript to this JSON file
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Prefix SRT lines with speaker labels
    #[arg(long)]
    pub speaker_labels: bool,
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Transcript JSON produced by the recognize command
    #[arg(short, long)]
    pub transcript: PathBuf,

    /// Analysis task
    #[arg(long, default_value = "smart-clip")]
    pub task: String,

    /// LLM provider name (defaults to the configured one)
    #[arg(long)]
    pub provider: Option<String>,

    /// Write the clip plan to this JSON file (smart-clip task)
    #[arg(long)]
    pub plan: Option<PathBuf>,
}

/// Arguments for the clip command
#[derive(Args, Debug)]
pub struct ClipArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Clip plan JSON from the analyze command
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub plan: Option<PathBuf>,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long, requires = "end")]
    pub start: Option<String>,

    /// End time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long, requires = "start")]
    pub end: Option<String>,

    /// Output directory (default: from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output quality preset
    #[arg(long, default_value = "medium")]
    pub quality: String,

    /// Join the clips into one highlight reel
    #[arg(long)]
    pub concat: bool,

    /// Produce a thumbnail per clip
    #[arg(long)]
    pub thumbnails: bool,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Transcript JSON produced by the recognize command
    #[arg(short, long)]
    pub transcript: PathBuf,

    /// Output format
    #[arg(long, default_value = "srt")]
    pub format: String,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep only this speaker (repeatable)
    #[arg(long = "speaker")]
    pub speakers: Vec<String>,

    /// Merge sentences separated by at most this many seconds
    #[arg(long)]
    pub merge_gap: Option<f64>,

    /// Prefix SRT lines with speaker labels
    #[arg(long)]
    pub speaker_labels: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input media file, or a directory to scan for media files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the pipeline command
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Analysis task driving segment selection
    #[arg(long, default_value = "smart-clip")]
    pub task: String,

    /// LLM provider name (defaults to the configured one)
    #[arg(long)]
    pub provider: Option<String>,

    /// Attribute sentences to speakers
    #[arg(long)]
    pub diarize: bool,

    /// Hotword biasing recognition (repeatable)
    #[arg(long = "hotword")]
    pub hotwords: Vec<String>,

    /// Output quality preset
    #[arg(long, default_value = "medium")]
    pub quality: String,

    /// Output directory (default: from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Join the clips into one highlight reel
    #[arg(long)]
    pub concat: bool,
}
