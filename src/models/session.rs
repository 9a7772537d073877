use serde::{Deserialize, Serialize};

use super::{FrameRecord, SpeakerAnalysis};

/// Root document describing one processed recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionIndex {
    pub video_file: String,
    pub transcript_file: String,
    pub duration_seconds: f64,
    pub total_frames: usize,
    pub frame_interval_seconds: f64,
    pub scene_detection_threshold: f64,
    pub speaker_analysis: SpeakerAnalysis,
    pub frames: Vec<FrameRecord>,
}
