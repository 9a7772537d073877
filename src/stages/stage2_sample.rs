use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::models::{CandidateFrame, SamplerConfig};
use crate::video::VideoTool;

/// Result of Stage 2 frame sampling
#[derive(Debug, Clone)]
pub struct SampleResult {
    /// Frames from the fixed-interval pass
    pub baseline_count: usize,
    /// Frames from the scene-change pass
    pub scene_count: usize,
    /// Frames left after the minimum-gap merge
    pub merged_count: usize,
    /// Final frames, sorted by timestamp
    pub frames: Vec<CandidateFrame>,
}

/// Execute Stage 2: sample, merge and downsample frames
///
/// The interval and scene-change passes read the same video and write
/// disjoint files, so they run concurrently. A failure in either is fatal.
pub async fn sample_frames<T: VideoTool>(
    tool: &T,
    video: &Path,
    frames_dir: &Path,
    duration_seconds: f64,
    config: &SamplerConfig,
) -> Result<SampleResult> {
    info!("Extracting baseline frames every {}s...", config.interval_seconds);
    info!("Detecting scene changes (threshold: {})...", config.scene_threshold);

    let baseline = async {
        tool.extract_interval_frames(video, frames_dir, config.interval_seconds, duration_seconds)
            .await
            .context("Baseline frame extraction failed")
    };
    let scenes = extract_scene_frames(tool, video, frames_dir, config.scene_threshold);
    let (baseline, scenes) = tokio::try_join!(baseline, scenes)?;

    info!("Extracted {} baseline frames", baseline.len());
    info!("Extracted {} scene change frames", scenes.len());

    let baseline_count = baseline.len();
    let scene_count = scenes.len();
    let merged = merge_frames(baseline, scenes, config.min_gap_seconds);
    let merged_count = merged.len();
    let frames = downsample(merged, config.target_frames);

    if frames.len() < merged_count {
        info!(
            "Downsampled {} merged frames to {}",
            merged_count,
            frames.len()
        );
    }

    Ok(SampleResult {
        baseline_count,
        scene_count,
        merged_count,
        frames,
    })
}

/// Detect scene changes and extract one still per reported instant
pub async fn extract_scene_frames<T: VideoTool>(
    tool: &T,
    video: &Path,
    frames_dir: &Path,
    threshold: f64,
) -> Result<Vec<CandidateFrame>> {
    let scene_times = tool
        .detect_scene_changes(video, threshold)
        .await
        .context("Scene change detection failed")?;

    info!("Detected {} scene changes", scene_times.len());

    let mut frames = Vec::with_capacity(scene_times.len());
    for (i, timestamp) in scene_times.into_iter().enumerate() {
        let name = scene_frame_name(i);
        tool.extract_still(video, timestamp, &frames_dir.join(&name))
            .await
            .with_context(|| format!("Failed to extract scene frame at {:.2}s", timestamp))?;
        debug!("Scene frame {} at {:.2}s", name, timestamp);
        frames.push(CandidateFrame::new(timestamp, name));
    }

    Ok(frames)
}

/// File name for the i-th (0-based) scene-change still
pub fn scene_frame_name(index: usize) -> String {
    format!("scene_{:04}.jpg", index)
}

/// Union both candidate lists and drop frames closer than `min_gap` to the last kept one
///
/// This is a greedy forward sweep, not an optimal spacing. Baseline frames
/// win ties with scene frames at the same instant.
pub fn merge_frames(
    baseline: Vec<CandidateFrame>,
    scene_changes: Vec<CandidateFrame>,
    min_gap: f64,
) -> Vec<CandidateFrame> {
    let mut candidates: Vec<CandidateFrame> = baseline.into_iter().chain(scene_changes).collect();
    candidates.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));

    let mut merged = Vec::with_capacity(candidates.len());
    let mut last_kept = -min_gap;

    for frame in candidates {
        if frame.timestamp_seconds - last_kept >= min_gap {
            last_kept = frame.timestamp_seconds;
            merged.push(frame);
        }
    }

    merged
}

/// Keep exactly `target` frames at evenly spaced indices when over budget
///
/// Picks `floor(i * len / target)` for `i in 0..target`. Count and order are
/// guaranteed; the minimum gap is not, since two picked indices may be
/// neighbours in a dense run.
pub fn downsample(frames: Vec<CandidateFrame>, target: usize) -> Vec<CandidateFrame> {
    if frames.len() <= target {
        return frames;
    }

    let step = frames.len() as f64 / target as f64;
    (0..target)
        .map(|i| ((i as f64 * step) as usize).min(frames.len() - 1))
        .map(|index| frames[index].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::mock::MockVideoTool;

    fn frames_at(times: &[f64], prefix: &str) -> Vec<CandidateFrame> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| CandidateFrame::new(t, format!("{prefix}_{i}.jpg")))
            .collect()
    }

    #[test]
    fn test_merge_respects_min_gap() {
        let baseline = frames_at(&[0.0, 5.0, 10.0, 15.0], "frame");
        let scenes = frames_at(&[1.0, 6.5, 7.2, 11.9, 12.0], "scene");

        let merged = merge_frames(baseline, scenes, 2.0);
        let times: Vec<f64> = merged.iter().map(|f| f.timestamp_seconds).collect();

        assert_eq!(times, vec![0.0, 5.0, 7.2, 10.0, 12.0, 15.0]);
        for pair in merged.windows(2) {
            assert!(pair[1].timestamp_seconds - pair[0].timestamp_seconds >= 2.0);
        }
    }

    #[test]
    fn test_merge_prefers_baseline_on_ties() {
        let merged = merge_frames(frames_at(&[5.0], "frame"), frames_at(&[5.0], "scene"), 2.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].screenshot, "frame_0.jpg");
    }

    #[test]
    fn test_merge_keeps_frame_at_zero() {
        let merged = merge_frames(frames_at(&[0.0], "frame"), vec![], 2.0);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_downsample_exact_count_and_order() {
        let times: Vec<f64> = (0..1000).map(|i| i as f64 * 2.0).collect();
        let frames = frames_at(&times, "frame");

        let sampled = downsample(frames, 300);

        assert_eq!(sampled.len(), 300);
        for pair in sampled.windows(2) {
            assert!(pair[0].timestamp_seconds < pair[1].timestamp_seconds);
        }
        assert_eq!(sampled[0].timestamp_seconds, 0.0);
    }

    #[test]
    fn test_downsample_under_budget_is_untouched() {
        let frames = frames_at(&[0.0, 2.0, 4.0], "frame");
        assert_eq!(downsample(frames.clone(), 3), frames);
        assert_eq!(downsample(frames.clone(), 10), frames);
    }

    #[test]
    fn test_downsample_can_break_min_gap() {
        // Known trade-off: index spacing ignores time spacing
        let frames = frames_at(&[0.0, 2.0, 4.0, 100.0, 200.0], "frame");
        let sampled = downsample(frames, 4);
        let times: Vec<f64> = sampled.iter().map(|f| f.timestamp_seconds).collect();
        assert_eq!(times, vec![0.0, 2.0, 4.0, 100.0]);
    }

    #[tokio::test]
    async fn test_sample_frames_with_mock_tool() {
        let tool = MockVideoTool::new(20.0, vec![1.0, 7.0, 7.5]);
        let dir = tempfile::tempdir().unwrap();

        let result = sample_frames(
            &tool,
            Path::new("call.mp4"),
            dir.path(),
            20.0,
            &SamplerConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.baseline_count, 4);
        assert_eq!(result.scene_count, 3);
        assert_eq!(tool.still_count(), 3);

        let times: Vec<f64> = result.frames.iter().map(|f| f.timestamp_seconds).collect();
        assert_eq!(times, vec![0.0, 5.0, 7.0, 10.0, 15.0]);
        assert_eq!(result.frames[2].screenshot, "scene_0001.jpg");
        assert_eq!(result.merged_count, 5);
    }

    #[tokio::test]
    async fn test_sample_frames_applies_target() {
        let tool = MockVideoTool::new(100.0, vec![]);
        let dir = tempfile::tempdir().unwrap();
        let config = SamplerConfig {
            interval_seconds: 5.0,
            target_frames: 7,
            ..Default::default()
        };

        let result = sample_frames(&tool, Path::new("call.mp4"), dir.path(), 100.0, &config)
            .await
            .unwrap();

        assert_eq!(result.merged_count, 20);
        assert_eq!(result.frames.len(), 7);
    }

    #[tokio::test]
    async fn test_scene_detection_failure_is_fatal() {
        let tool = MockVideoTool {
            duration_seconds: 20.0,
            fail_scene_detection: true,
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();

        let result = sample_frames(
            &tool,
            Path::new("call.mp4"),
            dir.path(),
            20.0,
            &SamplerConfig::default(),
        )
        .await;

        assert!(result.is_err());
    }
}
