//! Error handling module for SpeechClip

use thiserror::Error;

/// Main error type for SpeechClip operations
#[derive(Error, Debug)]
pub enum SpeechClipError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Time range validation error
    #[error("Invalid time range: start ({start}) must be less than end ({end})")]
    InvalidTimeRange { start: String, end: String },

    /// Model loading error (ASR model missing or unreadable, LLM misconfigured)
    #[error("Failed to load model: {message}")]
    ModelLoad { message: String },

    /// Media processing error (ffmpeg/ffprobe failures, decode errors)
    #[error("Media processing failed: {message}")]
    Processing { message: String },

    /// File operation error
    #[error("File operation failed on {path}: {message}")]
    FileOperation { path: String, message: String },

    /// Validation error (bad arguments, malformed plans or subtitles)
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Network error (LLM transport failures, non-success responses)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Transcription error
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for SpeechClip operations
pub type Result<T> = std::result::Result<T, SpeechClipError>;
