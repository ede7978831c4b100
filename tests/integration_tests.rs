use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use speechclip_cli::*;

/// Test utilities shared across integration tests
mod test_utils {
    use super::*;

    /// Create a test video file using FFmpeg (requires ffmpeg on PATH)
    pub fn create_test_video(output_path: &Path, duration: f64) -> Result<()> {
        use std::process::Command;

        let output = Command::new("ffmpeg")
            .args([
                "-f",
                "lavfi",
                "-i",
                "testsrc=duration=10:size=320x240:rate=30",
                "-f",
                "lavfi",
                "-i",
                "sine=frequency=1000:duration=10",
                "-c:v",
                "libx264",
                "-c:a",
                "aac",
                "-t",
                &duration.to_string(),
                "-y",
                &output_path.display().to_string(),
            ])
            .output()
            .map_err(|e| SpeechClipError::Processing {
                message: format!("failed to create test video: {}", e),
            })?;

        if !output.status.success() {
            return Err(SpeechClipError::Processing {
                message: format!(
                    "ffmpeg failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                ),
            });
        }

        Ok(())
    }

    /// Write a small two-speaker transcript JSON file
    pub fn write_test_transcript(path: &Path) {
        let mut transcript = Transcript::new("talk.mp4", "en");
        let mut first = Sentence::new("welcome to the show", 0.0, 2.5).unwrap();
        first.speaker = Some("spk0".to_string());
        let mut second = Sentence::new("glad to be here", 3.0, 5.0).unwrap();
        second.speaker = Some("spk1".to_string());
        transcript.sentences.extend([first, second]);
        transcript.save(path).unwrap();
    }
}

// Library-level workflow tests

#[test]
fn test_time_spec_parsing() {
    // Seconds format
    assert_eq!(TimeSpec::parse("90.5").unwrap().seconds, 90.5);

    // MM:SS and MM:SS.ms formats
    assert_eq!(TimeSpec::parse("01:30").unwrap().seconds, 90.0);
    assert_eq!(TimeSpec::parse("01:30.500").unwrap().seconds, 90.5);

    // HH:MM:SS.ms format
    assert_eq!(TimeSpec::parse("00:01:30.500").unwrap().seconds, 90.5);

    // Invalid formats
    assert!(TimeSpec::parse("invalid").is_err());
    assert!(TimeSpec::parse("10:75").is_err());
}

#[test]
fn test_transcript_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("transcript.json");

    test_utils::write_test_transcript(&path);
    let loaded = Transcript::load(&path).unwrap();

    assert_eq!(loaded.sentences.len(), 2);
    assert_eq!(loaded.speakers(), vec!["spk0", "spk1"]);
    assert_eq!(loaded.full_text(), "welcome to the show glad to be here");
}

#[test]
fn test_clip_plan_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plan.json");

    let plan = ClipPlan::new(
        "talk.mp4",
        vec![
            ClipSegment::new(10.0, 20.0, "opening").unwrap(),
            ClipSegment::new(45.0, 60.0, "key point").unwrap(),
        ],
    );
    plan.save(&path).unwrap();

    let loaded = ClipPlan::load(&path).unwrap();
    assert_eq!(loaded.segments.len(), 2);
    assert_eq!(loaded.total_duration(), 25.0);
}

#[test]
fn test_subtitle_export_workflow() {
    use speechclip_cli::services::{ExportFormat, ExportOptions, ExportService};

    let temp_dir = TempDir::new().unwrap();
    let transcript_path = temp_dir.path().join("transcript.json");
    test_utils::write_test_transcript(&transcript_path);

    let transcript = Transcript::load(&transcript_path).unwrap();
    let srt_path = temp_dir.path().join("out.srt");
    let options = ExportOptions {
        format: ExportFormat::Srt,
        speaker_labels: true,
        ..Default::default()
    };
    ExportService::export_transcript(&transcript, &options, &srt_path).unwrap();

    let parsed = speechclip_cli::subtitle::read_srt(&srt_path).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].speaker.as_deref(), Some("spk0"));
    assert_eq!(parsed[1].text, "glad to be here");
}

#[test]
fn test_config_round_trip_through_cli_layer() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let mut config = Config::default();
    config.asr.language = "zh".to_string();
    config.save(&config_path).unwrap();

    let loaded = Config::load(&config_path).unwrap();
    assert_eq!(loaded.asr.language, "zh");
}

// CLI behavior tests

#[test]
fn test_cli_help() {
    Command::cargo_bin("speechclip")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("speech-driven video clipping"));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("speechclip")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}

#[test]
fn test_cli_inspect_missing_file() {
    Command::cargo_bin("speechclip")
        .unwrap()
        .args(["inspect", "--input", "/definitely/not/here.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_inspect_directory_listing() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("talk.mp4"), b"x").unwrap();
    std::fs::write(temp_dir.path().join("notes.txt"), b"x").unwrap();

    Command::cargo_bin("speechclip")
        .unwrap()
        .args(["inspect", "--input", &temp_dir.path().display().to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("talk.mp4"))
        .stdout(predicate::str::contains("1 file(s)"));
}

#[test]
fn test_cli_clip_invalid_time() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.mp4");
    std::fs::write(&input, b"fake video data").unwrap();

    Command::cargo_bin("speechclip")
        .unwrap()
        .args([
            "clip",
            "--input",
            &input.display().to_string(),
            "--start",
            "notatime",
            "--end",
            "10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time format"));
}

#[test]
fn test_cli_clip_requires_plan_or_range() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.mp4");
    std::fs::write(&input, b"fake video data").unwrap();

    Command::cargo_bin("speechclip")
        .unwrap()
        .args(["clip", "--input", &input.display().to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--plan"));
}

#[test]
fn test_cli_analyze_invalid_task() {
    Command::cargo_bin("speechclip")
        .unwrap()
        .args([
            "analyze",
            "--transcript",
            "whatever.json",
            "--task",
            "poetry",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid analysis task"));
}

#[test]
fn test_cli_export_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let transcript_path = temp_dir.path().join("transcript.json");
    let output_path = temp_dir.path().join("out.srt");
    test_utils::write_test_transcript(&transcript_path);

    Command::cargo_bin("speechclip")
        .unwrap()
        .args([
            "export",
            "--transcript",
            &transcript_path.display().to_string(),
            "--format",
            "srt",
            "--output",
            &output_path.display().to_string(),
            "--speaker-labels",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let content = std::fs::read_to_string(&output_path).unwrap();
    assert!(content.contains("[spk0] welcome to the show"));
}

#[test]
fn test_cli_export_unknown_speaker_fails() {
    let temp_dir = TempDir::new().unwrap();
    let transcript_path = temp_dir.path().join("transcript.json");
    test_utils::write_test_transcript(&transcript_path);

    Command::cargo_bin("speechclip")
        .unwrap()
        .args([
            "export",
            "--transcript",
            &transcript_path.display().to_string(),
            "--output",
            &temp_dir.path().join("out.srt").display().to_string(),
            "--speaker",
            "spk9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no sentences remain"));
}

// End-to-end tests requiring external tools

#[test]
#[ignore] // Requires ffmpeg/ffprobe on PATH
fn test_inspect_real_video() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sample.mp4");
    test_utils::create_test_video(&input, 5.0).unwrap();

    Command::cargo_bin("speechclip")
        .unwrap()
        .args(["inspect", "--input", &input.display().to_string(), "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"duration\""));
}

#[test]
#[ignore] // Requires ffmpeg/ffprobe on PATH
fn test_clip_real_video_range() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sample.mp4");
    let output_dir = temp_dir.path().join("clips");
    test_utils::create_test_video(&input, 8.0).unwrap();

    Command::cargo_bin("speechclip")
        .unwrap()
        .args([
            "clip",
            "--input",
            &input.display().to_string(),
            "--start",
            "1.0",
            "--end",
            "3.0",
            "--output-dir",
            &output_dir.display().to_string(),
        ])
        .assert()
        .success();

    assert!(output_dir.join("clip_report.json").exists());
}
