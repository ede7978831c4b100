//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::{
    AnalyzeArgs, ClipArgs, ExportArgs, InspectArgs, PipelineArgs, RecognizeArgs,
};
use crate::config::Config;
use crate::domain::model::{ClipPlan, ClipSegment, TimeSpec, Transcript};
use crate::llm::prompts::render_transcript;
use crate::llm::AnalysisTask;
use crate::media::{MediaInfo, MediaProbe, Quality};
use crate::services::{
    AnalysisOutcome, AnalysisService, ClipReport, ClipRequest, ClippingService, ExportFormat,
    ExportOptions, ExportService, RecognitionOptions, RecognitionService,
};
use crate::utils::format_file_size;
use crate::utils::path::ensure_directory;

/// Execute the recognize command
pub async fn recognize(config: Config, args: RecognizeArgs) -> Result<()> {
    info!("Starting recognize operation");

    if args.input.is_file() && !config.is_supported_media(&args.input) {
        tracing::warn!(
            "{} does not have a configured media extension; attempting anyway",
            args.input.display()
        );
    }

    let options = RecognitionOptions {
        diarize: args.diarize,
        hotwords: args.hotwords,
        language: args.language,
        normalize: args.normalize,
        trim_silence: args.trim_silence,
    };

    let service = RecognitionService::new(config);
    let transcript = service
        .recognize(&args.input, &options)
        .await
        .context("Failed to recognize input file")?;

    println!(
        "Recognized {} sentence(s) over {:.1}s",
        transcript.sentences.len(),
        transcript.duration()
    );

    if let Some(json_path) = &args.json {
        transcript
            .save(json_path)
            .context("Failed to write transcript JSON")?;
        println!("Transcript written to {}", json_path.display());
    }

    if let Some(srt_path) = &args.srt {
        let export_options = ExportOptions {
            format: ExportFormat::Srt,
            speaker_labels: args.speaker_labels,
            ..Default::default()
        };
        ExportService::export_transcript(&transcript, &export_options, srt_path)
            .context("Failed to write SRT file")?;
        println!("Subtitles written to {}", srt_path.display());
    }

    if args.json.is_none() && args.srt.is_none() {
        println!();
        println!("{}", render_transcript(&transcript));
    }

    info!("Recognize operation completed successfully");
    Ok(())
}

/// Execute the analyze command
pub async fn analyze(config: Config, args: AnalyzeArgs) -> Result<()> {
    info!("Starting analyze operation");

    let task = AnalysisTask::parse(&args.task)?;
    let transcript = Transcript::load(&args.transcript).context("Failed to load transcript")?;

    let service = AnalysisService::new(config);
    let outcome = service
        .analyze(&transcript, task, args.provider.as_deref(), transcript.duration())
        .await
        .context("Analysis failed")?;

    match outcome {
        AnalysisOutcome::Plan(plan) => {
            let plan_path = args
                .plan
                .unwrap_or_else(|| default_plan_path(&args.transcript));
            plan.save(&plan_path).context("Failed to write clip plan")?;

            println!("Clip plan with {} segment(s):", plan.segments.len());
            for segment in &plan.segments {
                println!(
                    "  {:.1}s - {:.1}s  (score {}) {}",
                    segment.start_time, segment.end_time, segment.score, segment.description
                );
            }
            println!("Plan written to {}", plan_path.display());
        }
        AnalysisOutcome::Report(report) => {
            println!("{}", report);
        }
    }

    info!("Analyze operation completed successfully");
    Ok(())
}

/// Execute the clip command
pub async fn clip(config: Config, args: ClipArgs) -> Result<()> {
    info!("Starting clip operation");

    let plan = match (&args.plan, &args.start, &args.end) {
        (Some(plan_path), _, _) => {
            let mut plan = ClipPlan::load(plan_path).context("Failed to load clip plan")?;
            // The command-line input wins over whatever the plan recorded
            plan.source = args.input.clone();
            plan
        }
        (None, Some(start), Some(end)) => {
            let start = TimeSpec::parse(start)?;
            let end = TimeSpec::parse(end)?;
            let segment = ClipSegment::new(start.seconds, end.seconds, "manual range")?;
            ClipPlan::new(args.input.clone(), vec![segment])
        }
        _ => anyhow::bail!("either --plan or both --start and --end are required"),
    };

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.app.output_dir.clone());
    let request = ClipRequest {
        plan,
        output_dir,
        quality: Quality::parse(&args.quality)?,
        concat: args.concat,
        thumbnails: args.thumbnails,
    };

    let service = ClippingService::new(config);
    let report = service.clip(&request).await.context("Clipping failed")?;

    print_clip_report(&report);
    write_clip_report(&report, &request.output_dir)?;

    info!("Clip operation completed successfully");
    Ok(())
}

/// Execute the export command
pub async fn export(_config: Config, args: ExportArgs) -> Result<()> {
    info!("Starting export operation");

    let transcript = Transcript::load(&args.transcript).context("Failed to load transcript")?;
    let options = ExportOptions {
        format: ExportFormat::parse(&args.format)?,
        speakers: args.speakers,
        merge_gap: args.merge_gap,
        speaker_labels: args.speaker_labels,
        ..Default::default()
    };

    ExportService::export_transcript(&transcript, &options, &args.output)
        .context("Export failed")?;

    println!("Exported to {}", args.output.display());
    info!("Export operation completed successfully");
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(config: Config, args: InspectArgs) -> Result<()> {
    info!("Starting inspect operation");

    // A directory is inspected by listing the media files inside it
    if args.input.is_dir() {
        return inspect_directory(&config, &args.input);
    }

    let probe = MediaProbe::new(&config.app.ffprobe_path);
    let media_info = probe
        .probe(&args.input)
        .await
        .context("Failed to inspect input file")?;

    if args.json {
        let json = serde_json::to_string_pretty(&media_info)
            .context("Failed to serialize media info to JSON")?;
        println!("{}", json);
    } else {
        display_media_info(&media_info);
    }

    info!("Inspect operation completed successfully");
    Ok(())
}

/// Execute the pipeline command: recognize -> analyze -> clip -> export
pub async fn pipeline(config: Config, args: PipelineArgs) -> Result<()> {
    info!("Starting pipeline operation");

    let task = AnalysisTask::parse(&args.task)?;
    let quality = Quality::parse(&args.quality)?;
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.app.output_dir.clone());
    ensure_directory(&output_dir)?;

    let stem = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "media".to_string());

    // Stage 1: recognition
    let recognition = RecognitionService::new(config.clone());
    let options = RecognitionOptions {
        diarize: args.diarize,
        hotwords: args.hotwords.clone(),
        ..Default::default()
    };
    let transcript = recognition
        .recognize(&args.input, &options)
        .await
        .context("Recognition stage failed")?;

    let transcript_path = output_dir.join(format!("{}_transcript.json", stem));
    transcript
        .save(&transcript_path)
        .context("Failed to write transcript JSON")?;

    let srt_path = output_dir.join(format!("{}.srt", stem));
    let export_options = ExportOptions {
        format: ExportFormat::Srt,
        speaker_labels: args.diarize,
        ..Default::default()
    };
    ExportService::export_transcript(&transcript, &export_options, &srt_path)
        .context("Failed to write SRT file")?;

    println!(
        "Recognized {} sentence(s); transcript at {}",
        transcript.sentences.len(),
        transcript_path.display()
    );

    // Stage 2: analysis
    let probe = MediaProbe::new(&config.app.ffprobe_path);
    let media_duration = probe.probe(&args.input).await?.duration;

    let analysis = AnalysisService::new(config.clone());
    let outcome = analysis
        .analyze(&transcript, task, args.provider.as_deref(), media_duration)
        .await
        .context("Analysis stage failed")?;

    let plan = match outcome {
        AnalysisOutcome::Plan(plan) => plan,
        AnalysisOutcome::Report(report) => {
            // Text-only tasks end the pipeline at the written report
            let report_path = output_dir.join(format!("{}_analysis.txt", stem));
            std::fs::write(&report_path, &report).context("Failed to write analysis report")?;
            println!("Analysis report written to {}", report_path.display());
            return Ok(());
        }
    };

    let plan_path = output_dir.join(format!("{}_plan.json", stem));
    plan.save(&plan_path).context("Failed to write clip plan")?;
    println!(
        "Plan with {} segment(s) at {}",
        plan.segments.len(),
        plan_path.display()
    );

    // Stage 3: clipping
    let request = ClipRequest {
        plan,
        output_dir: output_dir.clone(),
        quality,
        concat: args.concat,
        thumbnails: false,
    };
    let clipping = ClippingService::new(config);
    let report = clipping.clip(&request).await.context("Clipping stage failed")?;

    print_clip_report(&report);
    write_clip_report(&report, &output_dir)?;

    info!("Pipeline operation completed successfully");
    Ok(())
}

/// List the media files under a directory with their sizes
fn inspect_directory(config: &Config, dir: &Path) -> Result<()> {
    let mut extensions = config.app.video_extensions.clone();
    extensions.extend(config.app.audio_extensions.iter().cloned());

    let files = crate::utils::path::find_media_files(dir, &extensions)
        .context("Failed to scan directory")?;

    if files.is_empty() {
        println!("No media files found under {}", dir.display());
        return Ok(());
    }

    println!("Media files under {}:", dir.display());
    for file in &files {
        let size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
        println!("  {}  ({})", file.display(), format_file_size(size));
    }
    println!("{} file(s)", files.len());

    Ok(())
}

/// Default plan path next to the transcript file
fn default_plan_path(transcript_path: &Path) -> PathBuf {
    let stem = transcript_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "transcript".to_string());
    transcript_path.with_file_name(format!("{}_plan.json", stem))
}

/// Persist the clip report as JSON alongside the clips
fn write_clip_report(report: &ClipReport, output_dir: &Path) -> Result<()> {
    let path = output_dir.join("clip_report.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).context("Failed to write clip report")?;
    Ok(())
}

/// Display a clip report in human-readable format
fn print_clip_report(report: &ClipReport) {
    println!(
        "Produced {} clip(s), {:.1}s total",
        report.clips.len(),
        report.total_duration
    );
    for clip in &report.clips {
        println!(
            "  [{:>3}] {:.1}s - {:.1}s  {} ({})",
            clip.segment_index,
            clip.start_time,
            clip.end_time,
            clip.file_path.display(),
            format_file_size(clip.file_size)
        );
    }
    if report.failed_segments > 0 {
        println!("Skipped {} failing segment(s)", report.failed_segments);
    }
    if let Some(concat) = &report.concat_file {
        println!("Highlight reel: {}", concat.display());
    }
}

/// Display media information in human-readable format
fn display_media_info(media_info: &MediaInfo) {
    println!("Media Information");
    println!("=================");
    println!("File: {}", media_info.file_path);
    println!("Format: {}", media_info.format);
    println!("Duration: {:.3}s", media_info.duration);
    println!("File Size: {}", format_file_size(media_info.file_size));
    if let Some(bit_rate) = media_info.bit_rate {
        println!("Bit Rate: {} bps", bit_rate);
    }
    println!();

    if !media_info.video_streams.is_empty() {
        println!("Video Streams:");
        for stream in &media_info.video_streams {
            println!(
                "  Stream {}: {} @ {:.2} fps",
                stream.index,
                stream.resolution(),
                stream.frame_rate
            );
            println!("    Codec: {}", stream.codec);
        }
        println!();
    }

    if !media_info.audio_streams.is_empty() {
        println!("Audio Streams:");
        for stream in &media_info.audio_streams {
            println!(
                "  Stream {}: {} Hz, {} channel(s)",
                stream.index, stream.sample_rate, stream.channels
            );
            println!("    Codec: {}", stream.codec);
            if let Some(language) = &stream.language {
                println!("    Language: {}", language);
            }
        }
        println!();
    }

    if !media_info.subtitle_streams.is_empty() {
        println!("Subtitle Streams:");
        for stream in &media_info.subtitle_streams {
            println!("  Stream {}: {}", stream.index, stream.codec);
        }
        println!();
    }

    if !media_info.metadata.is_empty() {
        println!("Metadata:");
        for (key, value) in &media_info.metadata {
            println!("  {}: {}", key, value);
        }
    }
}
