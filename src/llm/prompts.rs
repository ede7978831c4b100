//! Prompt templates for transcript analysis

use crate::domain::model::Transcript;
use crate::error::{Result, SpeechClipError};

/// Analysis task selecting the prompt sent to the LLM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTask {
    /// Propose highlight segments for clipping
    SmartClip,
    /// Summarize the content and key points
    Summary,
    /// Analyze per-speaker viewpoints and exchanges
    SpeakerAnalysis,
}

impl AnalysisTask {
    /// Parse a task name from the command line
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.to_lowercase().as_str() {
            "smart-clip" | "smartclip" | "clip" => Ok(AnalysisTask::SmartClip),
            "summary" | "summarize" => Ok(AnalysisTask::Summary),
            "speakers" | "speaker-analysis" => Ok(AnalysisTask::SpeakerAnalysis),
            _ => Err(SpeechClipError::Validation {
                message: format!(
                    "invalid analysis task '{}'. Valid tasks: smart-clip, summary, speakers",
                    raw
                ),
            }),
        }
    }

    /// System message framing the assistant's role
    pub fn system_prompt(&self) -> &'static str {
        match self {
            AnalysisTask::SmartClip => {
                "You are a video editing assistant. You select the most valuable \
                 segments of a video from its subtitles and answer in strict JSON."
            }
            AnalysisTask::Summary | AnalysisTask::SpeakerAnalysis => {
                "You are a video content analyst working from subtitles."
            }
        }
    }

    /// User message built around the rendered subtitles
    pub fn user_prompt(&self, subtitles: &str) -> String {
        match self {
            AnalysisTask::SmartClip => format!(
                "Based on the following video subtitles, identify the segments most \
                 worth clipping.\n\n\
                 Subtitles:\n{subtitles}\n\n\
                 Requirements:\n\
                 1. Identify the key information and highlights.\n\
                 2. Pick time ranges suitable for standalone clips.\n\
                 3. Give each segment a short description and a reason.\n\n\
                 Reply with JSON only, in this exact shape:\n\
                 {{\n\
                   \"segments\": [\n\
                     {{\n\
                       \"start_time\": <seconds>,\n\
                       \"end_time\": <seconds>,\n\
                       \"description\": \"<short description>\",\n\
                       \"reason\": \"<why this segment>\",\n\
                       \"score\": <1-10>\n\
                     }}\n\
                   ]\n\
                 }}"
            ),
            AnalysisTask::Summary => format!(
                "Summarize the following video subtitles.\n\n\
                 Subtitles:\n{subtitles}\n\n\
                 Provide:\n\
                 1. A summary of the main content.\n\
                 2. The key information points.\n\
                 3. Important timestamps.\n\
                 4. Segments that would work as short clips."
            ),
            AnalysisTask::SpeakerAnalysis => format!(
                "The following subtitles include speaker labels. Analyze the speakers.\n\n\
                 Subtitles:\n{subtitles}\n\n\
                 Analyze:\n\
                 1. Each speaker's main points.\n\
                 2. How the speakers interact.\n\
                 3. The most valuable exchanges.\n\
                 4. Which dialogue segments are worth clipping."
            ),
        }
    }
}

/// Render a transcript as timestamped lines for prompting, e.g.
/// `[12.0s - 15.5s] (spk0) text`
pub fn render_transcript(transcript: &Transcript) -> String {
    transcript
        .sentences
        .iter()
        .map(|sentence| {
            let speaker = sentence
                .speaker
                .as_ref()
                .map(|s| format!(" ({})", s))
                .unwrap_or_default();
            format!(
                "[{:.1}s - {:.1}s]{} {}",
                sentence.start_time, sentence.end_time, speaker, sentence.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
