use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::io::parse_transcript_file;
use crate::models::TranscriptSegment;
use crate::parsers::TranscriptFormat;

/// Result of Stage 0 ingestion
#[derive(Debug, Clone)]
pub struct IngestResult {
    /// Format the transcript was parsed as
    pub format: TranscriptFormat,
    /// Canonical segments ordered by start time
    pub segments: Vec<TranscriptSegment>,
    /// Whether the source listed segments out of order
    pub reordered: bool,
}

/// Execute Stage 0: parse a transcript file into canonical segments
///
/// Parsing itself never fails; only an unreadable file is an error.
pub fn ingest_transcript(path: &Path) -> Result<IngestResult> {
    let parsed = parse_transcript_file(path).context("Failed to ingest transcript")?;
    let mut segments = parsed.segments;
    let reordered = order_segments(&mut segments);

    if reordered {
        warn!("Transcript timestamps were not monotonic; segments reordered by start time");
    }
    if segments.is_empty() {
        warn!("No transcript segments found in {:?}", path);
    }

    info!(
        "Parsed {} segments as {} transcript",
        segments.len(),
        parsed.format.name()
    );
    for segment in segments.iter().take(3) {
        debug!(
            "  {:.2}-{:.2} [{}] {}",
            segment.start_seconds,
            segment.end_seconds,
            segment.speaker_or_unknown(),
            segment.text
        );
    }

    Ok(IngestResult {
        format: parsed.format,
        segments,
        reordered,
    })
}

/// Stable-sort segments by start time; returns whether anything moved
pub fn order_segments(segments: &mut [TranscriptSegment]) -> bool {
    let sorted = segments
        .windows(2)
        .all(|pair| pair[0].start_seconds <= pair[1].start_seconds);
    if sorted {
        return false;
    }
    segments.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
    true
}
