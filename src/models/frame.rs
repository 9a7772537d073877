use serde::{Deserialize, Serialize};

/// Transcript text recorded for frames with nothing to align to
pub const NO_TRANSCRIPT: &str = "[No transcript available]";

/// A sampled still before it is linked to the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFrame {
    /// Position in the source video, in seconds
    pub timestamp_seconds: f64,
    /// File name of the extracted still, relative to the frames directory
    pub screenshot: String,
}

impl CandidateFrame {
    pub fn new(timestamp_seconds: f64, screenshot: impl Into<String>) -> Self {
        Self {
            timestamp_seconds,
            screenshot: screenshot.into(),
        }
    }
}

/// A frame linked to the speech active at its instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Display timestamp (HH:MM:SS)
    pub timestamp: String,
    pub timestamp_seconds: f64,
    pub screenshot: String,
    pub transcript_segment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
}

impl FrameRecord {
    /// Whether the frame was linked to any transcript text
    pub fn has_transcript(&self) -> bool {
        !self.transcript_segment.is_empty() && self.transcript_segment != NO_TRANSCRIPT
    }
}

/// Configuration for frame sampling
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Period of the fixed-interval pass, in seconds
    pub interval_seconds: f64,
    /// Frame-difference score above which an instant counts as a scene change (0-1)
    pub scene_threshold: f64,
    /// Minimum spacing between merged frames, in seconds
    pub min_gap_seconds: f64,
    /// Ceiling on the number of frames kept after merging
    pub target_frames: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 5.0,
            scene_threshold: 0.3,
            min_gap_seconds: 2.0,
            target_frames: 500,
        }
    }
}

/// Configuration for frame-to-transcript alignment
#[derive(Debug, Clone)]
pub struct AlignConfig {
    /// Largest distance (exclusive) between a frame and the nearest segment start
    pub tolerance_seconds: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            tolerance_seconds: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_record_omits_missing_speaker() {
        let record = FrameRecord {
            timestamp: "00:00:05".to_string(),
            timestamp_seconds: 5.0,
            screenshot: "frame_0002.jpg".to_string(),
            transcript_segment: NO_TRANSCRIPT.to_string(),
            speaker_id: None,
            speaker_name: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("speaker_id").is_none());
        assert!(json.get("speaker_name").is_none());
        assert!(!record.has_transcript());
    }

    #[test]
    fn test_sampler_config_default() {
        let config = SamplerConfig::default();
        assert_eq!(config.interval_seconds, 5.0);
        assert_eq!(config.scene_threshold, 0.3);
        assert_eq!(config.min_gap_seconds, 2.0);
        assert_eq!(config.target_frames, 500);
    }
}
