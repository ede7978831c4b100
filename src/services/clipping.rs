//! Clipping service: plan execution, concatenation, thumbnails

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::model::ClipPlan;
use crate::error::{Result, SpeechClipError};
use crate::media::{ClipOutcome, Quality, VideoClipper};
use crate::utils::path::{ensure_directory, safe_filename};

/// A clipping job for one plan
#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub plan: ClipPlan,
    pub output_dir: PathBuf,
    pub quality: Quality,
    /// Join the clips into one highlight reel
    pub concat: bool,
    /// Produce a thumbnail per clip
    pub thumbnails: bool,
}

/// Result of executing a clipping job
#[derive(Debug, Serialize)]
pub struct ClipReport {
    pub source: PathBuf,
    pub created_at: DateTime<Utc>,
    pub clips: Vec<ClipOutcome>,
    pub failed_segments: usize,
    /// Total seconds of produced clips
    pub total_duration: f64,
    pub concat_file: Option<PathBuf>,
    pub thumbnails: Vec<PathBuf>,
}

/// Executes clip plans with ffmpeg
pub struct ClippingService {
    config: Config,
}

impl ClippingService {
    /// Create a clipping service over the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Cut every plan segment, then optionally concatenate and thumbnail
    pub async fn clip(&self, request: &ClipRequest) -> Result<ClipReport> {
        if request.plan.segments.is_empty() {
            return Err(SpeechClipError::Validation {
                message: "clip plan has no segments".to_string(),
            });
        }
        ensure_directory(&request.output_dir)?;

        let clipper =
            VideoClipper::new(&self.config.app.ffmpeg_path).with_quality(request.quality);

        let clips = clipper
            .clip_segments(&request.plan.source, &request.plan.segments, &request.output_dir)
            .await?;

        if clips.is_empty() {
            return Err(SpeechClipError::Processing {
                message: "every segment in the plan failed to clip".to_string(),
            });
        }

        let failed_segments = request.plan.segments.len() - clips.len();
        if failed_segments > 0 {
            warn!("{} segment(s) failed and were skipped", failed_segments);
        }

        let concat_file = if request.concat && clips.len() > 1 {
            let stem = request
                .plan
                .source
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "clips".to_string());
            let output = request
                .output_dir
                .join(safe_filename(&format!("{}_highlights.mp4", stem)));

            let paths: Vec<PathBuf> = clips.iter().map(|c| c.file_path.clone()).collect();
            clipper.concat(&paths, &output).await?;
            Some(output)
        } else {
            None
        };

        let mut thumbnails = Vec::new();
        if request.thumbnails {
            for clip in &clips {
                let thumb = clip.file_path.with_extension("jpg");
                // Grab the frame one second in, or the midpoint of very short clips
                let timestamp = if clip.duration > 2.0 {
                    1.0
                } else {
                    clip.duration / 2.0
                };
                match clipper.thumbnail(&clip.file_path, &thumb, timestamp).await {
                    Ok(()) => thumbnails.push(thumb),
                    Err(e) => warn!(
                        "Thumbnail for {} failed: {}",
                        clip.file_path.display(),
                        e
                    ),
                }
            }
        }

        let total_duration = clips.iter().map(|c| c.duration).sum();
        info!(
            "Produced {} clip(s), {:.1}s total, in {}",
            clips.len(),
            total_duration,
            request.output_dir.display()
        );

        Ok(ClipReport {
            source: request.plan.source.clone(),
            created_at: Utc::now(),
            clips,
            failed_segments,
            total_duration,
            concat_file,
            thumbnails,
        })
    }
}
