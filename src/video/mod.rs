pub mod ffmpeg;
#[cfg(test)]
pub mod mock;

pub use ffmpeg::{FfmpegConfig, FfmpegTool};

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::CandidateFrame;

/// Errors raised at the external video tool boundary
#[derive(Error, Debug)]
pub enum VideoToolError {
    #[error("{0} not found; install ffmpeg or point FFMPEG_BIN/FFPROBE_BIN at it")]
    MissingTool(String),

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("could not read a duration from probe output {0:?}")]
    InvalidDuration(String),

    #[error("no still was written to {path:?} for {timestamp_seconds}s")]
    MissingStill {
        path: PathBuf,
        timestamp_seconds: f64,
    },
}

/// Capabilities the frame sampler needs from a video decoding tool
///
/// Every call is made exactly once per request; failures are not retried.
pub trait VideoTool: Send + Sync {
    /// Total duration of the video in seconds
    fn probe_duration(
        &self,
        video: &Path,
    ) -> impl Future<Output = Result<f64, VideoToolError>> + Send;

    /// Write one still per `interval_seconds` into `frames_dir` and list them
    fn extract_interval_frames(
        &self,
        video: &Path,
        frames_dir: &Path,
        interval_seconds: f64,
        duration_seconds: f64,
    ) -> impl Future<Output = Result<Vec<CandidateFrame>, VideoToolError>> + Send;

    /// Instants whose frame-difference score exceeds `threshold`
    fn detect_scene_changes(
        &self,
        video: &Path,
        threshold: f64,
    ) -> impl Future<Output = Result<Vec<f64>, VideoToolError>> + Send;

    /// Write the still at `timestamp_seconds` to `output`
    fn extract_still(
        &self,
        video: &Path,
        timestamp_seconds: f64,
        output: &Path,
    ) -> impl Future<Output = Result<(), VideoToolError>> + Send;
}
