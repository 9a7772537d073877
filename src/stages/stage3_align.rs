use tracing::{debug, info};

use crate::models::{round_to, AlignConfig, CandidateFrame, FrameRecord, TranscriptSegment, NO_TRANSCRIPT};
use crate::parsers::format_timestamp;

/// Execute Stage 3: link each sampled frame to the speech active at its instant
pub fn align_frames(
    frames: &[CandidateFrame],
    segments: &[TranscriptSegment],
    config: &AlignConfig,
) -> Vec<FrameRecord> {
    let records: Vec<FrameRecord> = frames
        .iter()
        .map(|frame| align_frame(frame, segments, config))
        .collect();

    let linked = records.iter().filter(|r| r.has_transcript()).count();
    info!("Aligned {}/{} frames to transcript", linked, records.len());

    records
}

fn align_frame(frame: &CandidateFrame, segments: &[TranscriptSegment], config: &AlignConfig) -> FrameRecord {
    let t = frame.timestamp_seconds;
    let segment = find_segment(t, segments, config.tolerance_seconds);

    if segment.is_none() {
        debug!("No transcript near {:.2}s ({})", t, frame.screenshot);
    }

    FrameRecord {
        timestamp: format_timestamp(t),
        timestamp_seconds: round_to(t, 2),
        screenshot: frame.screenshot.clone(),
        transcript_segment: segment
            .map(|s| s.text.clone())
            .unwrap_or_else(|| NO_TRANSCRIPT.to_string()),
        speaker_id: segment.and_then(|s| s.speaker_id.clone()),
        speaker_name: segment.and_then(|s| s.speaker_name.clone()),
    }
}

/// Find the segment spoken at `timestamp`
///
/// An enclosing segment wins (first in list order). Otherwise the segment
/// whose start is closest is used, provided it lies strictly within
/// `tolerance` seconds; the earliest such segment wins ties.
pub fn find_segment(
    timestamp: f64,
    segments: &[TranscriptSegment],
    tolerance: f64,
) -> Option<&TranscriptSegment> {
    if let Some(segment) = segments.iter().find(|s| s.contains(timestamp)) {
        return Some(segment);
    }

    let mut nearest: Option<(&TranscriptSegment, f64)> = None;
    for segment in segments {
        let distance = (segment.start_seconds - timestamp).abs();
        if nearest.is_none_or(|(_, best)| distance < best) {
            nearest = Some((segment, distance));
        }
    }

    nearest
        .filter(|&(_, distance)| distance < tolerance)
        .map(|(segment, _)| segment)
}
