//! Export service: transcripts and plans to SRT or JSON files

use std::path::Path;

use tracing::info;

use crate::domain::model::Transcript;
use crate::error::{Result, SpeechClipError};
use crate::subtitle::{filter_by_speaker, merge_sentences, write_srt, SrtOptions};
use crate::utils::path::ensure_directory;

/// Output format for transcript export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Srt,
    Json,
}

impl ExportFormat {
    /// Parse a format name from the command line
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.to_lowercase().as_str() {
            "srt" => Ok(ExportFormat::Srt),
            "json" => Ok(ExportFormat::Json),
            _ => Err(SpeechClipError::Validation {
                message: format!("invalid export format '{}'. Valid formats: srt, json", raw),
            }),
        }
    }
}

/// Options shaping the exported sentences
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Keep only these speakers when non-empty
    pub speakers: Vec<String>,
    /// Merge sentences closer than this many seconds
    pub merge_gap: Option<f64>,
    /// Ceiling for merged block length in seconds
    pub max_block_duration: f64,
    /// Prefix SRT lines with speaker labels
    pub speaker_labels: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Srt,
            speakers: Vec::new(),
            merge_gap: None,
            max_block_duration: 30.0,
            speaker_labels: false,
        }
    }
}

/// Writes transcripts to disk in the requested shape
pub struct ExportService;

impl ExportService {
    /// Export a transcript, applying speaker filtering and merging first
    pub fn export_transcript(
        transcript: &Transcript,
        options: &ExportOptions,
        output: &Path,
    ) -> Result<()> {
        let mut sentences = transcript.sentences.clone();

        if !options.speakers.is_empty() {
            sentences = filter_by_speaker(&sentences, &options.speakers)?;
            if sentences.is_empty() {
                return Err(SpeechClipError::Validation {
                    message: format!(
                        "no sentences remain after filtering to speakers: {}",
                        options.speakers.join(", ")
                    ),
                });
            }
        }

        if let Some(gap) = options.merge_gap {
            sentences = merge_sentences(&sentences, gap, options.max_block_duration);
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent)?;
            }
        }

        match options.format {
            ExportFormat::Srt => {
                let srt_options = SrtOptions {
                    include_speaker: options.speaker_labels,
                };
                write_srt(&sentences, output, &srt_options)?;
            }
            ExportFormat::Json => {
                let shaped = Transcript {
                    source: transcript.source.clone(),
                    language: transcript.language.clone(),
                    sentences,
                };
                shaped.save(output)?;
            }
        }

        info!("Exported transcript to {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Sentence;

    fn make_transcript() -> Transcript {
        let mut transcript = Transcript::new("video.mp4", "en");
        let mut a = Sentence::new("hello", 0.0, 1.0).unwrap();
        a.speaker = Some("spk0".to_string());
        let mut b = Sentence::new("world", 1.2, 2.0).unwrap();
        b.speaker = Some("spk1".to_string());
        transcript.sentences.extend([a, b]);
        transcript
    }

    #[test]
    fn test_export_srt() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.srt");

        let options = ExportOptions {
            speaker_labels: true,
            ..Default::default()
        };
        ExportService::export_transcript(&make_transcript(), &options, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("[spk0] hello"));
        assert!(content.contains("[spk1] world"));
    }

    #[test]
    fn test_export_json_with_speaker_filter() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");

        let options = ExportOptions {
            format: ExportFormat::Json,
            speakers: vec!["spk1".to_string()],
            ..Default::default()
        };
        ExportService::export_transcript(&make_transcript(), &options, &output).unwrap();

        let loaded = Transcript::load(&output).unwrap();
        assert_eq!(loaded.sentences.len(), 1);
        assert_eq!(loaded.sentences[0].text, "world");
    }

    #[test]
    fn test_export_filter_to_nothing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.srt");

        let options = ExportOptions {
            speakers: vec!["spk9".to_string()],
            ..Default::default()
        };
        let result = ExportService::export_transcript(&make_transcript(), &options, &output);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("SRT").unwrap(), ExportFormat::Srt);
        assert_eq!(ExportFormat::parse("json").unwrap(), ExportFormat::Json);
        assert!(ExportFormat::parse("vtt").is_err());
    }
}
