//! Whisper-based recognition engine

use std::path::Path;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::AsrConfig;
use crate::domain::model::{Sentence, Transcript};
use crate::error::{Result, SpeechClipError};
use crate::media::audio::ASR_SAMPLE_RATE;

/// Speech recognition engine wrapping a local Whisper model
pub struct AsrEngine {
    ctx: WhisperContext,
    config: AsrConfig,
}

impl AsrEngine {
    /// Load the Whisper model named by the configuration
    pub fn new(config: AsrConfig) -> Result<Self> {
        let model_path = &config.model_path;

        if !model_path.exists() {
            return Err(SpeechClipError::ModelLoad {
                message: format!("ASR model not found at {}", model_path.display()),
            });
        }

        info!("Loading Whisper model from {}", model_path.display());

        let ctx_params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(
            model_path.to_str().unwrap_or_default(),
            ctx_params,
        )
        .map_err(|e| SpeechClipError::ModelLoad {
            message: format!("failed to load ASR model: {}", e),
        })?;

        info!("Whisper model loaded");

        Ok(Self { ctx, config })
    }

    /// Transcribe 16 kHz mono f32 samples into a transcript for `source`
    pub fn transcribe(&self, samples: &[f32], source: &Path) -> Result<Transcript> {
        if samples.is_empty() {
            return Err(SpeechClipError::Validation {
                message: "no audio samples to transcribe".to_string(),
            });
        }

        debug!(
            "Transcribing {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f64 / ASR_SAMPLE_RATE as f64
        );

        let hotword_prompt = self.hotword_prompt();

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.threads as i32);
        params.set_language(Some(&self.config.language));
        params.set_translate(self.config.translate);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_single_segment(false);
        params.set_no_context(true);
        if let Some(prompt) = &hotword_prompt {
            params.set_initial_prompt(prompt);
        }

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SpeechClipError::Transcription {
                message: format!("failed to create inference state: {}", e),
            })?;

        state
            .full(params, samples)
            .map_err(|e| SpeechClipError::Transcription {
                message: format!("inference failed: {}", e),
            })?;

        let num_segments =
            state
                .full_n_segments()
                .map_err(|e| SpeechClipError::Transcription {
                    message: e.to_string(),
                })?;

        let mut transcript = Transcript::new(source, &self.config.language);

        for i in 0..num_segments {
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| SpeechClipError::Transcription {
                    message: e.to_string(),
                })?;
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            // Whisper reports timestamps in centiseconds
            let start =
                state
                    .full_get_segment_t0(i)
                    .map_err(|e| SpeechClipError::Transcription {
                        message: e.to_string(),
                    })? as f64
                    / 100.0;
            let end =
                state
                    .full_get_segment_t1(i)
                    .map_err(|e| SpeechClipError::Transcription {
                        message: e.to_string(),
                    })? as f64
                    / 100.0;

            transcript.sentences.push(Sentence::new(text, start, end)?);
        }

        debug!(
            "Transcription complete: {} sentences, {:.2}s",
            transcript.sentences.len(),
            transcript.duration()
        );

        Ok(transcript)
    }

    /// Join hotwords into an initial prompt that biases decoding
    fn hotword_prompt(&self) -> Option<String> {
        if self.config.hotwords.is_empty() {
            return None;
        }
        Some(self.config.hotwords.join(", "))
    }

    /// The language configured for recognition
    pub fn language(&self) -> &str {
        &self.config.language
    }
}
