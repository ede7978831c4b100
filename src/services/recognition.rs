//! Recognition service: audio extraction, transcription, diarization

use std::path::Path;

use tracing::{info, warn};

use crate::asr::AsrEngine;
use crate::config::Config;
use crate::diarize::SpeakerDiarizer;
use crate::domain::model::Transcript;
use crate::error::{Result, SpeechClipError};
use crate::media::audio::{AudioExtractor, ExtractOptions, ASR_SAMPLE_RATE};
use crate::media::MediaProbe;
use crate::utils::path::ensure_directory;

/// Options for one recognition run
#[derive(Debug, Clone, Default)]
pub struct RecognitionOptions {
    /// Attribute sentences to speakers
    pub diarize: bool,
    /// Hotwords overriding the configured list when non-empty
    pub hotwords: Vec<String>,
    /// Language overriding the configured one
    pub language: Option<String>,
    /// Loudness-normalize the extracted audio
    pub normalize: bool,
    /// Trim leading/trailing silence before recognition
    pub trim_silence: bool,
}

/// Orchestrates probe -> extract -> transcribe -> diarize
pub struct RecognitionService {
    config: Config,
}

impl RecognitionService {
    /// Create a recognition service over the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the full recognition pipeline for one media file
    pub async fn recognize(&self, input: &Path, options: &RecognitionOptions) -> Result<Transcript> {
        let probe = MediaProbe::new(&self.config.app.ffprobe_path);
        let media_info = probe.probe(input).await?;

        if !media_info.has_audio() {
            return Err(SpeechClipError::Processing {
                message: format!("{} has no audio stream", input.display()),
            });
        }

        info!(
            "Recognizing {} ({:.1}s, {} streams)",
            input.display(),
            media_info.duration,
            media_info.total_streams()
        );

        // Extract into a scratch WAV that is removed when the handle drops
        ensure_directory(&self.config.app.temp_dir)?;
        let scratch = tempfile::Builder::new()
            .prefix("speechclip_")
            .suffix(".wav")
            .tempfile_in(&self.config.app.temp_dir)?;

        let extractor = AudioExtractor::new(&self.config.app.ffmpeg_path);
        let extract_options = ExtractOptions {
            normalize: options.normalize,
            trim_silence: options.trim_silence,
        };
        extractor
            .extract(input, scratch.path(), &extract_options)
            .await?;

        let samples = extractor.load_samples(scratch.path())?;

        let mut asr_config = self.config.asr.clone();
        if !options.hotwords.is_empty() {
            asr_config.hotwords = options.hotwords.clone();
        }
        if let Some(language) = &options.language {
            asr_config.language = language.clone();
        }

        // Whisper inference is CPU-bound; keep it off the async runtime
        let source = input.to_path_buf();
        let asr_samples = samples.clone();
        let mut transcript: Transcript = tokio::task::spawn_blocking(move || {
            let engine = AsrEngine::new(asr_config)?;
            engine.transcribe(&asr_samples, &source)
        })
        .await
        .map_err(|e| SpeechClipError::Transcription {
            message: format!("transcription task failed: {}", e),
        })??;

        if transcript.sentences.is_empty() {
            warn!("No speech recognized in {}", input.display());
        }

        if options.diarize {
            let diarizer = SpeakerDiarizer::new(self.config.diarize.clone(), ASR_SAMPLE_RATE);
            let segments = diarizer.diarize(&samples);
            info!(
                "Diarization produced {} segment(s) across {} speaker(s)",
                segments.len(),
                segments
                    .iter()
                    .map(|s| s.speaker.as_str())
                    .collect::<std::collections::HashSet<_>>()
                    .len()
            );
            SpeakerDiarizer::assign_speakers(&mut transcript, &segments);
        }

        Ok(transcript)
    }
}
