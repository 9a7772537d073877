use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::io::write_json;
use crate::models::{round_to, FrameRecord, SamplerConfig, SessionIndex, SpeakerAnalysis};

/// File name of the session index inside the output directory
pub const INDEX_FILE_NAME: &str = "index.json";

/// Execute Stage 4: assemble the session index document
pub fn build_session_index(
    video: &Path,
    transcript: &Path,
    duration_seconds: f64,
    sampler: &SamplerConfig,
    speaker_analysis: SpeakerAnalysis,
    frames: Vec<FrameRecord>,
) -> SessionIndex {
    SessionIndex {
        video_file: base_name(video),
        transcript_file: base_name(transcript),
        duration_seconds: round_to(duration_seconds, 2),
        total_frames: frames.len(),
        frame_interval_seconds: sampler.interval_seconds,
        scene_detection_threshold: sampler.scene_threshold,
        speaker_analysis,
        frames,
    }
}

/// Persist the index as `index.json` inside `output_dir`
pub fn write_session_index(index: &SessionIndex, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(INDEX_FILE_NAME);
    info!("Writing session index to {:?}", path);
    write_json(index, &path).context("Failed to write session index")?;
    Ok(path)
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_TRANSCRIPT;

    fn frame() -> FrameRecord {
        FrameRecord {
            timestamp: "00:00:00".to_string(),
            timestamp_seconds: 0.0,
            screenshot: "frame_0001.jpg".to_string(),
            transcript_segment: NO_TRANSCRIPT.to_string(),
            speaker_id: None,
            speaker_name: None,
        }
    }

    #[test]
    fn test_build_uses_base_names_and_rounds_duration() {
        let index = build_session_index(
            Path::new("/recordings/2024/call.mp4"),
            Path::new("/recordings/2024/call.vtt"),
            61.23456,
            &SamplerConfig::default(),
            SpeakerAnalysis::default(),
            vec![frame()],
        );

        assert_eq!(index.video_file, "call.mp4");
        assert_eq!(index.transcript_file, "call.vtt");
        assert_eq!(index.duration_seconds, 61.23);
        assert_eq!(index.total_frames, 1);
        assert_eq!(index.frame_interval_seconds, 5.0);
        assert_eq!(index.scene_detection_threshold, 0.3);
    }

    #[test]
    fn test_write_session_index() {
        let dir = tempfile::tempdir().unwrap();
        let index = build_session_index(
            Path::new("call.mp4"),
            Path::new("call.txt"),
            10.0,
            &SamplerConfig::default(),
            SpeakerAnalysis::default(),
            vec![],
        );

        let path = write_session_index(&index, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("index.json"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["speaker_analysis"]["total_speakers"], 0);
        assert!(json["frames"].as_array().unwrap().is_empty());
    }
}
