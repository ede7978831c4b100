//! Media processing via ffmpeg and ffprobe subprocesses

pub mod audio;
pub mod probe;
pub mod video;

pub use audio::AudioExtractor;
pub use probe::{MediaInfo, MediaProbe};
pub use video::{ClipOutcome, Quality, VideoClipper};

use tokio::process::Command;

use crate::error::{Result, SpeechClipError};

/// Run an external tool to completion, returning its stdout.
///
/// Non-zero exit status is surfaced as a processing error carrying the
/// tool's stderr, which is where ffmpeg reports its diagnostics.
pub(crate) async fn run_tool(program: &str, args: &[String]) -> Result<Vec<u8>> {
    tracing::debug!("Running {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| SpeechClipError::Processing {
            message: format!("failed to launch {}: {}", program, e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SpeechClipError::Processing {
            message: format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            ),
        });
    }

    Ok(output.stdout)
}
