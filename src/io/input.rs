use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{SessionIndex, TranscriptSegment};
use crate::parsers::{normalize_content, TranscriptFormat};

/// A transcript file parsed into canonical segments
#[derive(Debug, Clone)]
pub struct ParsedTranscript {
    /// Format the content was parsed as
    pub format: TranscriptFormat,
    /// Segments ordered by start time
    pub segments: Vec<TranscriptSegment>,
}

/// Read and parse a transcript file, detecting its format
pub fn parse_transcript_file(path: &Path) -> Result<ParsedTranscript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {:?}", path))?;
    Ok(parse_transcript_content(&content, Some(path)))
}

/// Parse transcript content; `path` is only used as a format hint
pub fn parse_transcript_content(content: &str, path: Option<&Path>) -> ParsedTranscript {
    let content = normalize_content(content);
    let format = TranscriptFormat::detect(path, &content);
    let segments = format.parser().parse(&content);
    ParsedTranscript { format, segments }
}

/// Load a session index previously written by the `process` command
pub fn load_session_index(path: &Path) -> Result<SessionIndex> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read index file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse index JSON: {:?}", path))
}
