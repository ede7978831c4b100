//! Video clipping, concatenation, and thumbnail generation

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::model::ClipSegment;
use crate::error::{Result, SpeechClipError};
use crate::media::run_tool;
use crate::utils::path::{ensure_directory, require_file, safe_filename, to_long_path};

/// Output quality preset, mapped to CRF and encoder preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    /// Parse a quality name from the command line
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.to_lowercase().as_str() {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            _ => Err(SpeechClipError::Validation {
                message: format!(
                    "invalid quality '{}'. Valid values: low, medium, high",
                    raw
                ),
            }),
        }
    }

    /// Constant rate factor for this preset
    pub fn crf(&self) -> u8 {
        match self {
            Quality::Low => 28,
            Quality::Medium => 23,
            Quality::High => 18,
        }
    }

    /// Encoder speed preset for this quality level
    pub fn preset(&self) -> &'static str {
        match self {
            Quality::Low => "fast",
            Quality::Medium => "medium",
            Quality::High => "slow",
        }
    }
}

/// Result of cutting one plan segment
#[derive(Debug, Clone, Serialize)]
pub struct ClipOutcome {
    pub segment_index: usize,
    pub file_path: PathBuf,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub file_size: u64,
}

/// Video clipper backed by the ffmpeg binary
pub struct VideoClipper {
    ffmpeg: String,
    quality: Quality,
    video_codec: String,
    audio_codec: String,
}

impl VideoClipper {
    /// Create a clipper using the given ffmpeg binary
    pub fn new(ffmpeg: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            quality: Quality::Medium,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
        }
    }

    /// Set the quality preset
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Set the video codec
    pub fn with_video_codec(mut self, codec: impl Into<String>) -> Self {
        self.video_codec = codec.into();
        self
    }

    /// Set the audio codec
    pub fn with_audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.audio_codec = codec.into();
        self
    }

    /// Cut a single time range into an output file
    pub async fn clip(&self, input: &Path, output: &Path, start: f64, end: f64) -> Result<()> {
        require_file(input)?;
        if end <= start {
            return Err(SpeechClipError::InvalidTimeRange {
                start: format!("{:.3}", start),
                end: format!("{:.3}", end),
            });
        }
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent)?;
            }
        }

        let args = self.build_clip_args(input, output, start, end);
        run_tool(&self.ffmpeg, &args).await?;

        if !output.exists() {
            return Err(SpeechClipError::Processing {
                message: format!("clipping produced no output at {}", output.display()),
            });
        }

        Ok(())
    }

    /// Cut every segment of a plan into numbered clip files.
    ///
    /// A failing segment is logged and skipped so one bad range does not
    /// lose the rest of the plan.
    pub async fn clip_segments(
        &self,
        input: &Path,
        segments: &[ClipSegment],
        output_dir: &Path,
    ) -> Result<Vec<ClipOutcome>> {
        require_file(input)?;
        ensure_directory(output_dir)?;

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "clip".to_string());

        let mut outcomes = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            let name = safe_filename(&format!("{}_clip_{:03}.mp4", stem, i));
            let output = output_dir.join(name);

            match self
                .clip(input, &output, segment.start_time, segment.end_time)
                .await
            {
                Ok(()) => {
                    let file_size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
                    info!(
                        "Clipped segment {} ({:.3}s - {:.3}s) to {}",
                        i,
                        segment.start_time,
                        segment.end_time,
                        output.display()
                    );
                    outcomes.push(ClipOutcome {
                        segment_index: i,
                        file_path: output,
                        start_time: segment.start_time,
                        end_time: segment.end_time,
                        duration: segment.duration(),
                        file_size,
                    });
                }
                Err(e) => {
                    warn!("Segment {} failed: {}", i, e);
                }
            }
        }

        Ok(outcomes)
    }

    /// Join clips into one file using the concat demuxer
    pub async fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<()> {
        if clips.is_empty() {
            return Err(SpeechClipError::Validation {
                message: "nothing to concatenate".to_string(),
            });
        }

        // The concat demuxer reads inputs from a list file
        let mut list_file = tempfile::NamedTempFile::new()?;
        for clip in clips {
            let escaped = clip.display().to_string().replace('\'', "'\\''");
            writeln!(list_file, "file '{}'", escaped)?;
        }
        list_file.flush()?;

        let args = vec![
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            list_file.path().display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            "-y".to_string(),
            output.display().to_string(),
        ];

        info!("Concatenating {} clips to {}", clips.len(), output.display());
        run_tool(&self.ffmpeg, &args).await?;

        if !output.exists() {
            return Err(SpeechClipError::Processing {
                message: format!("concatenation produced no output at {}", output.display()),
            });
        }

        Ok(())
    }

    /// Grab a single frame as a JPEG thumbnail
    pub async fn thumbnail(&self, input: &Path, output: &Path, timestamp: f64) -> Result<()> {
        require_file(input)?;

        let args = vec![
            "-i".to_string(),
            input.display().to_string(),
            "-ss".to_string(),
            format!("{:.3}", timestamp),
            "-vframes".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            "-y".to_string(),
            output.display().to_string(),
        ];

        run_tool(&self.ffmpeg, &args).await?;

        if !output.exists() {
            return Err(SpeechClipError::Processing {
                message: format!("thumbnail produced no output at {}", output.display()),
            });
        }

        Ok(())
    }

    /// Build the ffmpeg argument list for one cut
    fn build_clip_args(&self, input: &Path, output: &Path, start: f64, end: f64) -> Vec<String> {
        vec![
            "-i".to_string(),
            to_long_path(input).display().to_string(),
            "-ss".to_string(),
            format!("{:.3}", start),
            "-t".to_string(),
            format!("{:.3}", end - start),
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-crf".to_string(),
            self.quality.crf().to_string(),
            "-preset".to_string(),
            self.quality.preset().to_string(),
            "-avoid_negative_ts".to_string(),
            "make_zero".to_string(),
            "-y".to_string(),
            output.display().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_parse() {
        assert_eq!(Quality::parse("high").unwrap(), Quality::High);
        assert_eq!(Quality::parse("MEDIUM").unwrap(), Quality::Medium);
        assert!(Quality::parse("ultra").is_err());
    }

    #[test]
    fn test_quality_mapping() {
        assert_eq!(Quality::Low.crf(), 28);
        assert_eq!(Quality::Low.preset(), "fast");
        assert_eq!(Quality::Medium.crf(), 23);
        assert_eq!(Quality::High.crf(), 18);
        assert_eq!(Quality::High.preset(), "slow");
    }

    #[test]
    fn test_build_clip_args() {
        let clipper = VideoClipper::new("ffmpeg").with_quality(Quality::High);
        let args = clipper.build_clip_args(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            10.0,
            25.5,
        );

        let joined = args.join(" ");
        assert!(joined.contains("-ss 10.000"));
        assert!(joined.contains("-t 15.500"));
        assert!(joined.contains("-crf 18"));
        assert!(joined.contains("-preset slow"));
        assert!(joined.contains("-avoid_negative_ts make_zero"));
    }

    #[tokio::test]
    async fn test_clip_rejects_invalid_range() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"x").unwrap();

        let clipper = VideoClipper::new("ffmpeg");
        let result = clipper
            .clip(&input, &dir.path().join("out.mp4"), 10.0, 5.0)
            .await;
        assert!(result.is_err());
    }
}
