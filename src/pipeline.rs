use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use tracing::info;

use crate::models::{AlignConfig, SamplerConfig, SessionIndex};
use crate::stages::{
    align_frames, analyze_turns, build_session_index, ingest_transcript, sample_frames,
    write_session_index,
};
use crate::video::VideoTool;

/// Directory, inside the output directory, holding extracted stills
pub const FRAMES_DIR_NAME: &str = "frames";

/// Configuration for one processing run
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub sampler: SamplerConfig,
    pub align: AlignConfig,
}

impl SessionConfig {
    /// Reject settings the sampler cannot honor
    pub fn validate(&self) -> Result<()> {
        let sampler = &self.sampler;
        ensure!(
            sampler.interval_seconds.is_finite() && sampler.interval_seconds > 0.0,
            "Frame interval must be positive, got {}",
            sampler.interval_seconds
        );
        ensure!(
            (0.0..=1.0).contains(&sampler.scene_threshold),
            "Scene threshold must be between 0 and 1, got {}",
            sampler.scene_threshold
        );
        ensure!(
            sampler.min_gap_seconds.is_finite() && sampler.min_gap_seconds >= 0.0,
            "Minimum frame gap must not be negative, got {}",
            sampler.min_gap_seconds
        );
        ensure!(sampler.target_frames >= 1, "Target frame count must be at least 1");
        Ok(())
    }
}

/// Inputs and destination of one processing run
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub video: PathBuf,
    pub transcript: PathBuf,
    pub output_dir: PathBuf,
}

impl SessionRequest {
    /// Build a request, defaulting the output directory from the video path
    pub fn new(video: PathBuf, transcript: PathBuf, output_dir: Option<PathBuf>) -> Self {
        let output_dir = output_dir.unwrap_or_else(|| default_output_dir(&video));
        Self {
            video,
            transcript,
            output_dir,
        }
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join(FRAMES_DIR_NAME)
    }
}

/// `<video dir>/output/<video stem>`
pub fn default_output_dir(video: &Path) -> PathBuf {
    let parent = video.parent().unwrap_or_else(|| Path::new(""));
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "session".to_string());
    parent.join("output").join(stem)
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub index: SessionIndex,
    pub index_path: PathBuf,
}

/// Run every stage for one recording and persist the session index
pub async fn run_session<T: VideoTool>(
    tool: &T,
    request: &SessionRequest,
    config: &SessionConfig,
) -> Result<SessionOutcome> {
    config.validate()?;

    // Stage 0: Ingest
    info!("Stage 0: Parsing transcript {:?}...", request.transcript);
    let ingest = ingest_transcript(&request.transcript)?;

    // Stage 1: Turns and speaker metrics
    info!("Stage 1: Analyzing speakers...");
    let turns = analyze_turns(&ingest.segments);

    // Stage 2: Frame sampling
    let frames_dir = request.frames_dir();
    tokio::fs::create_dir_all(&frames_dir)
        .await
        .with_context(|| format!("Failed to create frames directory: {:?}", frames_dir))?;

    let duration = tool
        .probe_duration(&request.video)
        .await
        .with_context(|| format!("Failed to probe video duration: {:?}", request.video))?;
    info!("Video duration: {:.1}s", duration);

    info!("Stage 2: Sampling frames...");
    let sample = sample_frames(tool, &request.video, &frames_dir, duration, &config.sampler).await?;
    info!(
        "Stage 2: {} baseline + {} scene frames, {} after merge, {} kept",
        sample.baseline_count,
        sample.scene_count,
        sample.merged_count,
        sample.frames.len()
    );

    // Stage 3: Alignment
    info!("Stage 3: Aligning frames with transcript...");
    let records = align_frames(&sample.frames, &ingest.segments, &config.align);

    // Stage 4: Index
    info!("Stage 4: Writing session index...");
    let index = build_session_index(
        &request.video,
        &request.transcript,
        duration,
        &config.sampler,
        turns.speaker_analysis,
        records,
    );
    let index_path = write_session_index(&index, &request.output_dir)?;

    info!(
        "Complete: {:.1}s of video, {} frames, {} speakers, {} turns",
        index.duration_seconds,
        index.total_frames,
        index.speaker_analysis.total_speakers,
        index.speaker_analysis.total_turns
    );
    info!("Index: {:?}", index_path);
    info!("Frames: {:?}", frames_dir);

    Ok(SessionOutcome { index, index_path })
}
