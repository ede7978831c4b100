//! Speaker diarization
//!
//! Windows the audio into short frames, computes cheap voice features, and
//! clusters voiced windows into speaker labels `spk0..spkN`. Sentences are
//! attributed to the speaker whose segments overlap them the most.

use tracing::debug;

use crate::config::DiarizeConfig;
use crate::domain::model::{SpeakerSegment, Transcript};

/// RMS energy below which a window counts as silence
const ENERGY_FLOOR: f32 = 0.01;

/// Fallback label when no speaker segment overlaps a sentence
const DEFAULT_SPEAKER: &str = "spk0";

/// Per-window voice feature vector
#[derive(Debug, Clone, Copy)]
struct VoiceFeatures {
    /// RMS energy
    energy: f32,
    /// Zero-crossing rate in [0, 1]
    zcr: f32,
    /// High-frequency content: first-difference energy relative to signal energy
    flux: f32,
}

impl VoiceFeatures {
    fn compute(samples: &[f32]) -> Self {
        if samples.is_empty() {
            return Self {
                energy: 0.0,
                zcr: 0.0,
                flux: 0.0,
            };
        }

        let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
        let energy = (sum_squares / samples.len() as f32).sqrt();

        let crossings = samples
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        let zcr = crossings as f32 / samples.len() as f32;

        let diff_squares: f32 = samples.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        let flux = if sum_squares > 0.0 {
            (diff_squares / sum_squares).sqrt().min(2.0) / 2.0
        } else {
            0.0
        };

        Self { energy, zcr, flux }
    }

    /// Distance between feature vectors, with energy de-emphasized so that
    /// loudness changes within one speaker do not split the cluster
    fn distance(&self, other: &Self) -> f32 {
        let de = (self.energy - other.energy) * 0.5;
        let dz = self.zcr - other.zcr;
        let df = self.flux - other.flux;
        (de * de + dz * dz + df * df).sqrt()
    }
}

/// Running centroid of one speaker cluster
#[derive(Debug)]
struct Cluster {
    centroid: VoiceFeatures,
    count: usize,
}

impl Cluster {
    fn update(&mut self, features: &VoiceFeatures) {
        let n = self.count as f32;
        self.centroid.energy = (self.centroid.energy * n + features.energy) / (n + 1.0);
        self.centroid.zcr = (self.centroid.zcr * n + features.zcr) / (n + 1.0);
        self.centroid.flux = (self.centroid.flux * n + features.flux) / (n + 1.0);
        self.count += 1;
    }
}

/// Feature-clustering speaker diarizer
pub struct SpeakerDiarizer {
    config: DiarizeConfig,
    sample_rate: u32,
}

impl SpeakerDiarizer {
    /// Create a diarizer for audio at the given sample rate
    pub fn new(config: DiarizeConfig, sample_rate: u32) -> Self {
        Self {
            config,
            sample_rate,
        }
    }

    /// Cluster the audio into speaker segments.
    ///
    /// Silent windows carry no label; adjacent windows with the same label
    /// merge into one segment.
    pub fn diarize(&self, samples: &[f32]) -> Vec<SpeakerSegment> {
        let window_len = (self.config.window_secs * self.sample_rate as f64) as usize;
        if window_len == 0 || samples.is_empty() {
            return Vec::new();
        }

        let mut clusters: Vec<Cluster> = Vec::new();
        let mut labels: Vec<Option<usize>> = Vec::new();

        for window in samples.chunks(window_len) {
            let features = VoiceFeatures::compute(window);
            if features.energy < ENERGY_FLOOR {
                labels.push(None);
                continue;
            }

            labels.push(Some(self.assign_cluster(&mut clusters, &features)));
        }

        debug!(
            "Diarization found {} speaker(s) over {} windows",
            clusters.len(),
            labels.len()
        );

        self.labels_to_segments(&labels, window_len, samples.len())
    }

    /// Assign a window to the nearest cluster, opening a new one when it is
    /// far from everything seen so far and the speaker budget allows
    fn assign_cluster(&self, clusters: &mut Vec<Cluster>, features: &VoiceFeatures) -> usize {
        let nearest = clusters
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.centroid.distance(features)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        match nearest {
            Some((index, dist))
                if dist <= self.config.change_threshold as f32
                    || clusters.len() >= self.config.max_speakers =>
            {
                clusters[index].update(features);
                index
            }
            _ => {
                clusters.push(Cluster {
                    centroid: *features,
                    count: 1,
                });
                clusters.len() - 1
            }
        }
    }

    /// Merge consecutive windows with the same label into segments
    fn labels_to_segments(
        &self,
        labels: &[Option<usize>],
        window_len: usize,
        total_samples: usize,
    ) -> Vec<SpeakerSegment> {
        let window_secs = window_len as f64 / self.sample_rate as f64;
        let total_secs = total_samples as f64 / self.sample_rate as f64;

        let mut segments: Vec<SpeakerSegment> = Vec::new();

        for (i, label) in labels.iter().enumerate() {
            let Some(label) = label else { continue };
            let speaker = format!("spk{}", label);
            let start = i as f64 * window_secs;
            let end = ((i + 1) as f64 * window_secs).min(total_secs);

            match segments.last_mut() {
                Some(last) if last.speaker == speaker && (start - last.end_time).abs() < 1e-9 => {
                    last.end_time = end;
                }
                _ => segments.push(SpeakerSegment {
                    speaker,
                    start_time: start,
                    end_time: end,
                }),
            }
        }

        segments
    }

    /// Label each transcript sentence with the speaker of maximum overlap.
    /// Sentences no segment overlaps fall back to the first speaker label.
    pub fn assign_speakers(transcript: &mut Transcript, segments: &[SpeakerSegment]) {
        for sentence in &mut transcript.sentences {
            let mut best_speaker: Option<&str> = None;
            let mut max_overlap = 0.0;

            for segment in segments {
                let overlap = sentence.overlap_with(segment.start_time, segment.end_time);
                if overlap > max_overlap {
                    max_overlap = overlap;
                    best_speaker = Some(&segment.speaker);
                }
            }

            sentence.speaker = Some(
                best_speaker
                    .map(str::to_string)
                    .unwrap_or_else(|| DEFAULT_SPEAKER.to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Sentence;

    fn tone(freq: f64, secs: f64, amplitude: f32, sample_rate: u32) -> Vec<f32> {
        let count = (secs * sample_rate as f64) as usize;
        (0..count)
            .map(|i| {
                amplitude
                    * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin()
                        as f32
            })
            .collect()
    }

    fn make_diarizer() -> SpeakerDiarizer {
        SpeakerDiarizer::new(DiarizeConfig::default(), 16_000)
    }

    #[test]
    fn test_silence_produces_no_segments() {
        let diarizer = make_diarizer();
        let silence = vec![0.0f32; 16_000 * 3];
        assert!(diarizer.diarize(&silence).is_empty());
    }

    #[test]
    fn test_single_voice_is_one_speaker() {
        let diarizer = make_diarizer();
        let voice = tone(220.0, 3.0, 0.4, 16_000);
        let segments = diarizer.diarize(&voice);

        assert!(!segments.is_empty());
        assert!(segments.iter().all(|s| s.speaker == "spk0"));
    }

    #[test]
    fn test_distinct_voices_get_distinct_labels() {
        let diarizer = make_diarizer();
        let mut samples = tone(150.0, 3.0, 0.4, 16_000);
        samples.extend(tone(3500.0, 3.0, 0.4, 16_000));

        let segments = diarizer.diarize(&samples);
        let speakers: std::collections::HashSet<_> =
            segments.iter().map(|s| s.speaker.clone()).collect();
        assert!(speakers.len() >= 2);
    }

    #[test]
    fn test_adjacent_windows_merge() {
        let diarizer = make_diarizer();
        let voice = tone(220.0, 4.0, 0.4, 16_000);
        let segments = diarizer.diarize(&voice);

        // One continuous voice should not fragment into per-window segments
        assert_eq!(segments.len(), 1);
        assert!(segments[0].duration() > 3.5);
    }

    #[test]
    fn test_assign_speakers_max_overlap() {
        let mut transcript = Transcript::new("video.mp4", "en");
        transcript
            .sentences
            .push(Sentence::new("mostly second speaker", 4.0, 10.0).unwrap());

        let segments = vec![
            SpeakerSegment {
                speaker: "spk0".to_string(),
                start_time: 0.0,
                end_time: 5.0,
            },
            SpeakerSegment {
                speaker: "spk1".to_string(),
                start_time: 5.0,
                end_time: 12.0,
            },
        ];

        SpeakerDiarizer::assign_speakers(&mut transcript, &segments);
        assert_eq!(transcript.sentences[0].speaker.as_deref(), Some("spk1"));
    }

    #[test]
    fn test_assign_speakers_default_when_no_overlap() {
        let mut transcript = Transcript::new("video.mp4", "en");
        transcript
            .sentences
            .push(Sentence::new("outside all segments", 100.0, 105.0).unwrap());

        let segments = vec![SpeakerSegment {
            speaker: "spk3".to_string(),
            start_time: 0.0,
            end_time: 5.0,
        }];

        SpeakerDiarizer::assign_speakers(&mut transcript, &segments);
        assert_eq!(transcript.sentences[0].speaker.as_deref(), Some("spk0"));
    }
}
