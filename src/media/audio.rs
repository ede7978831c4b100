//! Audio extraction and conditioning
//!
//! Produces the 16 kHz mono PCM WAV that the recognition engine consumes,
//! and loads it back as normalized f32 samples.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SpeechClipError};
use crate::media::run_tool;
use crate::utils::path::{ensure_directory, require_file, safe_filename, to_long_path};

/// Sample rate required by the recognition engine
pub const ASR_SAMPLE_RATE: u32 = 16_000;

/// Options for audio conditioning during extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Apply EBU R128 loudness normalization
    pub normalize: bool,
    /// Strip leading and trailing silence
    pub trim_silence: bool,
}

/// Audio extractor backed by the ffmpeg binary
pub struct AudioExtractor {
    ffmpeg: String,
    sample_rate: u32,
}

impl AudioExtractor {
    /// Create an extractor using the given ffmpeg binary
    pub fn new(ffmpeg: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            sample_rate: ASR_SAMPLE_RATE,
        }
    }

    /// Override the output sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Extract the audio track as 16-bit mono PCM WAV
    pub async fn extract(
        &self,
        input: &Path,
        output: &Path,
        options: &ExtractOptions,
    ) -> Result<()> {
        require_file(input)?;
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent)?;
            }
        }

        let mut args = vec![
            "-i".to_string(),
            to_long_path(input).display().to_string(),
            "-vn".to_string(),
            "-acodec".to_string(),
            "pcm_s16le".to_string(),
            "-ar".to_string(),
            self.sample_rate.to_string(),
            "-ac".to_string(),
            "1".to_string(),
        ];

        let mut filters = Vec::new();
        if options.normalize {
            filters.push("loudnorm".to_string());
        }
        if options.trim_silence {
            // Trim silence from the head, reverse to trim the tail the same way
            filters.push(
                "silenceremove=start_periods=1:start_threshold=-45dB,areverse,\
                 silenceremove=start_periods=1:start_threshold=-45dB,areverse"
                    .to_string(),
            );
        }
        if !filters.is_empty() {
            args.push("-af".to_string());
            args.push(filters.join(","));
        }

        args.push("-y".to_string());
        args.push(output.display().to_string());

        info!("Extracting audio from {}", input.display());
        run_tool(&self.ffmpeg, &args).await?;

        if !output.exists() {
            return Err(SpeechClipError::Processing {
                message: format!(
                    "audio extraction produced no output at {}",
                    output.display()
                ),
            });
        }

        Ok(())
    }

    /// Cut audio ranges into separate files with stream copy.
    /// Ranges with a non-positive duration are skipped.
    pub async fn segment(
        &self,
        input: &Path,
        ranges: &[(f64, f64)],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        require_file(input)?;
        ensure_directory(output_dir)?;

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        let mut outputs = Vec::new();
        for (i, &(start, end)) in ranges.iter().enumerate() {
            if end <= start {
                debug!("Skipping empty audio range {}..{}", start, end);
                continue;
            }

            let name = safe_filename(&format!("{}_segment_{:03}.wav", stem, i));
            let output = output_dir.join(name);

            let args = vec![
                "-i".to_string(),
                input.display().to_string(),
                "-ss".to_string(),
                format!("{:.3}", start),
                "-t".to_string(),
                format!("{:.3}", end - start),
                "-acodec".to_string(),
                "copy".to_string(),
                "-y".to_string(),
                output.display().to_string(),
            ];

            run_tool(&self.ffmpeg, &args).await?;
            if output.exists() {
                outputs.push(output);
            }
        }

        Ok(outputs)
    }

    /// Load a WAV file as f32 samples normalized to [-1.0, 1.0].
    ///
    /// The file must match the extractor's sample rate and be mono; anything
    /// else means it did not come from [`AudioExtractor::extract`].
    pub fn load_samples(&self, wav_path: &Path) -> Result<Vec<f32>> {
        let reader =
            hound::WavReader::open(wav_path).map_err(|e| SpeechClipError::Processing {
                message: format!("failed to open WAV {}: {}", wav_path.display(), e),
            })?;

        let spec = reader.spec();
        if spec.sample_rate != self.sample_rate {
            return Err(SpeechClipError::Processing {
                message: format!(
                    "expected {} Hz audio, got {} Hz",
                    self.sample_rate, spec.sample_rate
                ),
            });
        }
        if spec.channels != 1 {
            return Err(SpeechClipError::Processing {
                message: format!("expected mono audio, got {} channels", spec.channels),
            });
        }

        let samples: Vec<f32> = match spec.bits_per_sample {
            16 => reader
                .into_samples::<i16>()
                .filter_map(std::result::Result::ok)
                .map(|s| s as f32 / 32768.0)
                .collect(),
            32 => reader
                .into_samples::<i32>()
                .filter_map(std::result::Result::ok)
                .map(|s| s as f32 / 2147483648.0)
                .collect(),
            bits => {
                return Err(SpeechClipError::Processing {
                    message: format!("unsupported WAV bit depth: {}", bits),
                })
            }
        };

        debug!(
            "Loaded {} samples ({:.2}s) from {}",
            samples.len(),
            samples.len() as f64 / self.sample_rate as f64,
            wav_path.display()
        );

        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_load_samples_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wav");
        write_test_wav(&path, ASR_SAMPLE_RATE, 1, &[0, 16384, -16384, 32767]);

        let extractor = AudioExtractor::new("ffmpeg");
        let samples = extractor.load_samples(&path).unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 0.5).abs() < 1e-4);
        assert!((samples[2] + 0.5).abs() < 1e-4);
        assert!(samples[3] <= 1.0);
    }

    #[test]
    fn test_load_samples_rejects_wrong_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wav");
        write_test_wav(&path, 44_100, 1, &[0, 1, 2]);

        let extractor = AudioExtractor::new("ffmpeg");
        assert!(extractor.load_samples(&path).is_err());
    }

    #[test]
    fn test_load_samples_rejects_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wav");
        write_test_wav(&path, ASR_SAMPLE_RATE, 2, &[0, 1, 2, 3]);

        let extractor = AudioExtractor::new("ffmpeg");
        assert!(extractor.load_samples(&path).is_err());
    }
}
