//! Media probing via ffprobe
//!
//! Runs `ffprobe -print_format json` and maps the result into stream-level
//! information used by planning, validation, and the inspect command.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeechClipError};
use crate::media::run_tool;
use crate::utils::path::{require_file, to_long_path};

/// Video stream information
#[derive(Debug, Clone, Serialize)]
pub struct VideoStreamInfo {
    pub index: usize,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub bit_rate: Option<u64>,
}

impl VideoStreamInfo {
    /// Resolution as "WxH"
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Audio stream information
#[derive(Debug, Clone, Serialize)]
pub struct AudioStreamInfo {
    pub index: usize,
    pub codec: String,
    pub sample_rate: u32,
    pub channels: u32,
    pub bit_rate: Option<u64>,
    pub language: Option<String>,
}

/// Subtitle stream information
#[derive(Debug, Clone, Serialize)]
pub struct SubtitleStreamInfo {
    pub index: usize,
    pub codec: String,
    pub language: Option<String>,
}

/// Complete media file information
#[derive(Debug, Clone, Serialize)]
pub struct MediaInfo {
    pub file_path: String,
    pub format: String,
    /// Duration in seconds
    pub duration: f64,
    pub file_size: u64,
    pub bit_rate: Option<u64>,
    pub video_streams: Vec<VideoStreamInfo>,
    pub audio_streams: Vec<AudioStreamInfo>,
    pub subtitle_streams: Vec<SubtitleStreamInfo>,
    pub metadata: HashMap<String, String>,
}

impl MediaInfo {
    /// Total number of streams
    pub fn total_streams(&self) -> usize {
        self.video_streams.len() + self.audio_streams.len() + self.subtitle_streams.len()
    }

    /// Whether the file carries at least one audio stream
    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    /// Primary video stream (usually the first one)
    pub fn primary_video_stream(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }
}

// ffprobe JSON shapes - only the fields we consume

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    format_name: String,
    duration: Option<String>,
    size: Option<String>,
    bit_rate: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: usize,
    codec_type: String,
    #[serde(default)]
    codec_name: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
    bit_rate: Option<String>,
    duration: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Media prober backed by the ffprobe binary
pub struct MediaProbe {
    ffprobe: String,
}

impl MediaProbe {
    /// Create a prober using the given ffprobe binary
    pub fn new(ffprobe: impl Into<String>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }

    /// Probe a media file and return complete information
    pub async fn probe(&self, input: &Path) -> Result<MediaInfo> {
        require_file(input)?;

        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            "-show_streams".to_string(),
            to_long_path(input).display().to_string(),
        ];

        let stdout = run_tool(&self.ffprobe, &args).await?;
        let parsed: FfprobeOutput =
            serde_json::from_slice(&stdout).map_err(|e| SpeechClipError::Processing {
                message: format!("failed to parse ffprobe output: {}", e),
            })?;

        Ok(Self::build_media_info(input, parsed))
    }

    fn build_media_info(input: &Path, parsed: FfprobeOutput) -> MediaInfo {
        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();
        let mut subtitle_streams = Vec::new();
        let mut stream_duration: f64 = 0.0;

        for stream in parsed.streams {
            if let Some(duration) = parse_numeric(&stream.duration) {
                stream_duration = stream_duration.max(duration);
            }

            match stream.codec_type.as_str() {
                "video" => video_streams.push(VideoStreamInfo {
                    index: stream.index,
                    codec: stream.codec_name,
                    width: stream.width.unwrap_or(0),
                    height: stream.height.unwrap_or(0),
                    frame_rate: stream
                        .r_frame_rate
                        .as_deref()
                        .map(parse_frame_rate)
                        .unwrap_or(0.0),
                    bit_rate: parse_integer(&stream.bit_rate),
                }),
                "audio" => audio_streams.push(AudioStreamInfo {
                    index: stream.index,
                    codec: stream.codec_name,
                    sample_rate: stream
                        .sample_rate
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0),
                    channels: stream.channels.unwrap_or(0),
                    bit_rate: parse_integer(&stream.bit_rate),
                    language: stream.tags.get("language").cloned(),
                }),
                "subtitle" => subtitle_streams.push(SubtitleStreamInfo {
                    index: stream.index,
                    codec: stream.codec_name,
                    language: stream.tags.get("language").cloned(),
                }),
                _ => {}
            }
        }

        // Container duration is authoritative; streams are the fallback
        let duration = parse_numeric(&parsed.format.duration).unwrap_or(stream_duration);

        MediaInfo {
            file_path: input.display().to_string(),
            format: parsed.format.format_name,
            duration,
            file_size: parse_integer(&parsed.format.size).unwrap_or(0),
            bit_rate: parse_integer(&parsed.format.bit_rate),
            video_streams,
            audio_streams,
            subtitle_streams,
            metadata: parsed.format.tags,
        }
    }
}

/// Parse an optional numeric string field
fn parse_numeric(value: &Option<String>) -> Option<f64> {
    value.as_deref().and_then(|s| s.parse().ok())
}

/// Parse an optional integer string field
fn parse_integer(value: &Option<String>) -> Option<u64> {
    value.as_deref().and_then(|s| s.parse().ok())
}

/// Parse an ffprobe rational frame rate such as "30000/1001"
fn parse_frame_rate(raw: &str) -> f64 {
    match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().unwrap_or(0.0);
            let den: f64 = den.parse().unwrap_or(0.0);
            if den > 0.0 {
                num / den
            } else {
                0.0
            }
        }
        None => raw.parse().unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), 30.0);
        assert!((parse_frame_rate("30000/1001") - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("25"), 25.0);
        assert_eq!(parse_frame_rate("0/0"), 0.0);
    }

    #[test]
    fn test_build_media_info_from_ffprobe_json() {
        let raw = r#"{
            "streams": [
                {
                    "index": 0,
                    "codec_type": "video",
                    "codec_name": "h264",
                    "width": 1920,
                    "height": 1080,
                    "r_frame_rate": "30000/1001",
                    "bit_rate": "4000000"
                },
                {
                    "index": 1,
                    "codec_type": "audio",
                    "codec_name": "aac",
                    "sample_rate": "48000",
                    "channels": 2,
                    "tags": {"language": "eng"}
                }
            ],
            "format": {
                "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                "duration": "120.5",
                "size": "60250000",
                "bit_rate": "4000000",
                "tags": {"title": "Demo"}
            }
        }"#;

        let parsed: FfprobeOutput = serde_json::from_str(raw).unwrap();
        let info = MediaProbe::build_media_info(&PathBuf::from("demo.mp4"), parsed);

        assert_eq!(info.duration, 120.5);
        assert_eq!(info.total_streams(), 2);
        assert!(info.has_audio());
        assert_eq!(info.primary_video_stream().unwrap().resolution(), "1920x1080");
        assert_eq!(info.audio_streams[0].language.as_deref(), Some("eng"));
        assert_eq!(info.metadata.get("title").map(String::as_str), Some("Demo"));
    }

    #[test]
    fn test_duration_falls_back_to_streams() {
        let raw = r#"{
            "streams": [
                {"index": 0, "codec_type": "audio", "codec_name": "pcm_s16le",
                 "sample_rate": "16000", "channels": 1, "duration": "42.0"}
            ],
            "format": {"format_name": "wav"}
        }"#;

        let parsed: FfprobeOutput = serde_json::from_str(raw).unwrap();
        let info = MediaProbe::build_media_info(&PathBuf::from("audio.wav"), parsed);
        assert_eq!(info.duration, 42.0);
    }
}
