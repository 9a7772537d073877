use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::ffmpeg::{interval_frame_name, interval_instants};
use super::{VideoTool, VideoToolError};
use crate::models::CandidateFrame;

/// In-memory video tool for exercising the sampler without ffmpeg
#[derive(Debug, Default)]
pub struct MockVideoTool {
    pub duration_seconds: f64,
    pub scene_times: Vec<f64>,
    pub fail_scene_detection: bool,
    pub stills: Mutex<Vec<(f64, PathBuf)>>,
}

impl MockVideoTool {
    pub fn new(duration_seconds: f64, scene_times: Vec<f64>) -> Self {
        Self {
            duration_seconds,
            scene_times,
            ..Default::default()
        }
    }

    pub fn still_count(&self) -> usize {
        self.stills.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl VideoTool for MockVideoTool {
    async fn probe_duration(&self, _video: &Path) -> Result<f64, VideoToolError> {
        Ok(self.duration_seconds)
    }

    async fn extract_interval_frames(
        &self,
        _video: &Path,
        _frames_dir: &Path,
        interval_seconds: f64,
        duration_seconds: f64,
    ) -> Result<Vec<CandidateFrame>, VideoToolError> {
        Ok(interval_instants(interval_seconds, duration_seconds)
            .into_iter()
            .map(|(n, t)| CandidateFrame::new(t, interval_frame_name(n)))
            .collect())
    }

    async fn detect_scene_changes(&self, _video: &Path, _threshold: f64) -> Result<Vec<f64>, VideoToolError> {
        if self.fail_scene_detection {
            return Err(VideoToolError::Failed {
                tool: "mock".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "decode error".to_string(),
            });
        }
        Ok(self.scene_times.clone())
    }

    async fn extract_still(
        &self,
        _video: &Path,
        timestamp_seconds: f64,
        output: &Path,
    ) -> Result<(), VideoToolError> {
        if let Ok(mut stills) = self.stills.lock() {
            stills.push((timestamp_seconds, output.to_path_buf()));
        }
        Ok(())
    }
}
