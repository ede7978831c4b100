// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeechClipError};

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Create a new TimeSpec from hours, minutes, seconds, milliseconds
    pub fn from_components(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
        let total_seconds = hours as f64 * 3600.0
            + minutes as f64 * 60.0
            + seconds as f64
            + milliseconds as f64 / 1000.0;
        Self {
            seconds: total_seconds,
        }
    }

    /// Convert to Duration
    pub fn to_duration(&self) -> Duration {
        Duration::from_secs_f64(self.seconds.max(0.0))
    }

    /// Parse time string in various formats
    pub fn parse(time_str: &str) -> Result<Self> {
        let trimmed = time_str.trim();

        // Try parsing as seconds (float)
        if let Ok(seconds) = trimmed.parse::<f64>() {
            if seconds < 0.0 {
                return Err(SpeechClipError::InvalidTimeFormat {
                    time: time_str.to_string(),
                });
            }
            return Ok(Self::from_seconds(seconds));
        }

        // Try parsing as HH:MM:SS.ms or MM:SS.ms
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() == 2 {
            // MM:SS.ms format
            let minutes = parts[0]
                .parse::<u32>()
                .map_err(|_| SpeechClipError::InvalidTimeFormat {
                    time: time_str.to_string(),
                })?;
            let seconds_part =
                parts[1]
                    .parse::<f64>()
                    .map_err(|_| SpeechClipError::InvalidTimeFormat {
                        time: time_str.to_string(),
                    })?;

            if seconds_part < 0.0 || seconds_part >= 60.0 {
                return Err(SpeechClipError::InvalidTimeFormat {
                    time: time_str.to_string(),
                });
            }

            Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds_part))
        } else if parts.len() == 3 {
            // HH:MM:SS.ms format
            let hours = parts[0]
                .parse::<u32>()
                .map_err(|_| SpeechClipError::InvalidTimeFormat {
                    time: time_str.to_string(),
                })?;
            let minutes = parts[1]
                .parse::<u32>()
                .map_err(|_| SpeechClipError::InvalidTimeFormat {
                    time: time_str.to_string(),
                })?;
            let seconds_part =
                parts[2]
                    .parse::<f64>()
                    .map_err(|_| SpeechClipError::InvalidTimeFormat {
                        time: time_str.to_string(),
                    })?;

            if minutes >= 60 || seconds_part < 0.0 || seconds_part >= 60.0 {
                return Err(SpeechClipError::InvalidTimeFormat {
                    time: time_str.to_string(),
                });
            }

            Ok(Self::from_seconds(
                hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds_part,
            ))
        } else {
            Err(SpeechClipError::InvalidTimeFormat {
                time: time_str.to_string(),
            })
        }
    }

    /// Format as HH:MM:SS.ms (hours omitted when zero)
    pub fn format_hms(&self) -> String {
        let hours = (self.seconds / 3600.0) as u32;
        let minutes = ((self.seconds % 3600.0) / 60.0) as u32;
        let seconds = (self.seconds % 60.0) as u32;
        let milliseconds = ((self.seconds % 1.0) * 1000.0).round() as u32;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// A single recognized sentence with timing and optional speaker attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Recognition confidence in [0.0, 1.0]
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Speaker label (e.g. "spk0") when diarization ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

fn default_confidence() -> f64 {
    1.0
}

impl Sentence {
    /// Create a new sentence with validation
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Result<Self> {
        if end_time < start_time {
            return Err(SpeechClipError::InvalidTimeRange {
                start: format!("{:.3}", start_time),
                end: format!("{:.3}", end_time),
            });
        }

        Ok(Self {
            text: text.into(),
            start_time,
            end_time,
            confidence: 1.0,
            speaker: None,
        })
    }

    /// Sentence duration in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Overlap in seconds with an arbitrary time range
    pub fn overlap_with(&self, start: f64, end: f64) -> f64 {
        (self.end_time.min(end) - self.start_time.max(start)).max(0.0)
    }
}

/// Complete recognition result for one media file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Source media file
    pub source: PathBuf,
    /// Recognition language code (e.g. "en", "zh")
    pub language: String,
    /// Sentences in temporal order
    pub sentences: Vec<Sentence>,
}

impl Transcript {
    /// Create an empty transcript for a source file
    pub fn new(source: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            language: language.into(),
            sentences: Vec::new(),
        }
    }

    /// Concatenated text of all sentences
    pub fn full_text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// End time of the last sentence, in seconds
    pub fn duration(&self) -> f64 {
        self.sentences.last().map(|s| s.end_time).unwrap_or(0.0)
    }

    /// Distinct speaker labels in order of first appearance
    pub fn speakers(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for sentence in &self.sentences {
            if let Some(speaker) = &sentence.speaker {
                if !seen.contains(speaker) {
                    seen.push(speaker.clone());
                }
            }
        }
        seen
    }

    /// Load a transcript from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SpeechClipError::FileOperation {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the transcript as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| SpeechClipError::FileOperation {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// A contiguous span attributed to one speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSegment {
    pub speaker: String,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
}

impl SpeakerSegment {
    /// Segment duration in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// One segment proposed for clipping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSegment {
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Short description of the segment content
    #[serde(default)]
    pub description: String,
    /// Why the segment was selected
    #[serde(default)]
    pub reason: String,
    /// Recommendation score, 1-10
    #[serde(default = "default_score")]
    pub score: u8,
}

fn default_score() -> u8 {
    5
}

impl ClipSegment {
    /// Create a new clip segment with validation
    pub fn new(start_time: f64, end_time: f64, description: impl Into<String>) -> Result<Self> {
        if start_time < 0.0 || end_time <= start_time {
            return Err(SpeechClipError::InvalidTimeRange {
                start: format!("{:.3}", start_time),
                end: format!("{:.3}", end_time),
            });
        }

        Ok(Self {
            start_time,
            end_time,
            description: description.into(),
            reason: String::new(),
            score: 5,
        })
    }

    /// Segment duration in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// An ordered clipping plan for one source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipPlan {
    /// Source media file the plan applies to
    pub source: PathBuf,
    /// Segments in playback order
    pub segments: Vec<ClipSegment>,
}

impl ClipPlan {
    /// Create a plan from segments, sorted by start time
    pub fn new(source: impl Into<PathBuf>, mut segments: Vec<ClipSegment>) -> Self {
        segments.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self {
            source: source.into(),
            segments,
        }
    }

    /// Sum of segment durations in seconds
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration()).sum()
    }

    /// Drop segments outside the media duration, clamping ends that overrun it.
    /// Returns the number of segments removed.
    pub fn validate_against(&mut self, media_duration: f64) -> usize {
        let before = self.segments.len();
        self.segments.retain(|s| s.start_time < media_duration);
        for segment in &mut self.segments {
            if segment.end_time > media_duration {
                segment.end_time = media_duration;
            }
        }
        self.segments.retain(|s| s.duration() > 0.0);
        before - self.segments.len()
    }

    /// Load a plan from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SpeechClipError::FileOperation {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the plan as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| SpeechClipError::FileOperation {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests;
