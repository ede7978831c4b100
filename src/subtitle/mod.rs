//! SRT subtitle generation, parsing, filtering, and merging

use std::path::Path;

use tracing::warn;

use crate::domain::model::Sentence;
use crate::error::{Result, SpeechClipError};

/// Options controlling SRT generation
#[derive(Debug, Clone, Default)]
pub struct SrtOptions {
    /// Prefix each line with its speaker label, e.g. `[spk0] text`
    pub include_speaker: bool,
}

/// Render sentences as SRT content. Sentences with empty text are skipped.
pub fn generate_srt(sentences: &[Sentence], options: &SrtOptions) -> String {
    let mut blocks = Vec::new();
    let mut index = 1;

    for sentence in sentences {
        let text = sentence.text.trim();
        if text.is_empty() {
            continue;
        }

        let text = match (&sentence.speaker, options.include_speaker) {
            (Some(speaker), true) => format!("[{}] {}", speaker, text),
            _ => text.to_string(),
        };

        blocks.push(format!(
            "{}\n{} --> {}\n{}\n",
            index,
            format_srt_timestamp(sentence.start_time),
            format_srt_timestamp(sentence.end_time),
            text
        ));
        index += 1;
    }

    blocks.join("\n")
}

/// Write sentences to an SRT file
pub fn write_srt(sentences: &[Sentence], path: &Path, options: &SrtOptions) -> Result<()> {
    let content = generate_srt(sentences, options);
    std::fs::write(path, content).map_err(|e| SpeechClipError::FileOperation {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Parse SRT content into sentences.
///
/// Malformed blocks are skipped with a warning rather than failing the whole
/// parse; speaker prefixes of the form `[name] text` are recovered.
pub fn parse_srt(content: &str) -> Vec<Sentence> {
    let normalized = content.replace("\r\n", "\n");
    let mut sentences = Vec::new();

    for block in normalized.split("\n\n") {
        let lines: Vec<&str> = block.trim().lines().collect();
        if lines.len() < 3 {
            continue;
        }

        // First line is the sequence number; the timing line follows
        if lines[0].trim().parse::<u32>().is_err() {
            warn!("Skipping SRT block with invalid index: {:?}", lines[0]);
            continue;
        }

        let Some((start, end)) = parse_timing_line(lines[1]) else {
            warn!("Skipping SRT block with invalid timing: {:?}", lines[1]);
            continue;
        };

        let raw_text = lines[2..].join("\n");
        let (speaker, text) = split_speaker_prefix(&raw_text);
        if text.is_empty() {
            continue;
        }

        match Sentence::new(text, start, end) {
            Ok(mut sentence) => {
                sentence.speaker = speaker;
                sentences.push(sentence);
            }
            Err(e) => warn!("Skipping SRT block with invalid range: {}", e),
        }
    }

    sentences
}

/// Load and parse an SRT file
pub fn read_srt(path: &Path) -> Result<Vec<Sentence>> {
    let content = std::fs::read_to_string(path).map_err(|e| SpeechClipError::FileOperation {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(parse_srt(&content))
}

/// Keep only sentences spoken by one of the given speakers
pub fn filter_by_speaker(sentences: &[Sentence], speakers: &[String]) -> Result<Vec<Sentence>> {
    if speakers.is_empty() {
        return Err(SpeechClipError::Validation {
            message: "speaker filter requires at least one speaker label".to_string(),
        });
    }

    Ok(sentences
        .iter()
        .filter(|s| {
            s.speaker
                .as_ref()
                .map(|speaker| speakers.contains(speaker))
                .unwrap_or(false)
        })
        .cloned()
        .collect())
}

/// Merge consecutive sentences separated by at most `max_gap` seconds, as
/// long as the merged block stays within `max_duration` seconds. Text is
/// concatenated; the speaker label of the longest contribution wins.
pub fn merge_sentences(sentences: &[Sentence], max_gap: f64, max_duration: f64) -> Vec<Sentence> {
    let mut merged: Vec<Sentence> = Vec::new();

    for sentence in sentences {
        match merged.last_mut() {
            Some(last)
                if sentence.start_time - last.end_time <= max_gap
                    && sentence.end_time - last.start_time <= max_duration =>
            {
                // Longest-contribution speaker: keep the existing label unless
                // the incoming sentence outweighs everything merged so far
                if sentence.duration() > last.duration() {
                    last.speaker = sentence.speaker.clone();
                }
                last.text.push(' ');
                last.text.push_str(sentence.text.trim());
                last.end_time = sentence.end_time;
                last.confidence = last.confidence.min(sentence.confidence);
            }
            _ => merged.push(sentence.clone()),
        }
    }

    merged
}

/// Format seconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_seconds = total_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, ms)
}

/// Parse an SRT timestamp (HH:MM:SS,mmm) into seconds
pub fn parse_srt_timestamp(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let (hms, ms) = raw.split_once(',')?;
    let parts: Vec<&str> = hms.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: u64 = parts[0].parse().ok()?;
    let minutes: u64 = parts[1].parse().ok()?;
    let seconds: u64 = parts[2].parse().ok()?;
    let millis: u64 = ms.parse().ok()?;
    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return None;
    }

    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0)
}

/// Parse a "start --> end" timing line
fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once("-->")?;
    Some((parse_srt_timestamp(start)?, parse_srt_timestamp(end)?))
}

/// Split an optional leading "[speaker] " prefix from subtitle text
fn split_speaker_prefix(text: &str) -> (Option<String>, String) {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('[') {
        if let Some((speaker, remainder)) = rest.split_once(']') {
            if !speaker.is_empty() && !speaker.contains('\n') {
                return (Some(speaker.to_string()), remainder.trim().to_string());
            }
        }
    }
    (None, trimmed.to_string())
}
