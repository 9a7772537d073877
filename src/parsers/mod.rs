pub mod cue_block;
pub mod freeform;
pub mod indexed_cue;
pub mod speaker;
pub mod timestamp;

pub use cue_block::CueBlockParser;
pub use freeform::FreeformParser;
pub use indexed_cue::IndexedCueParser;
pub use speaker::{split_leading_label, SpeakerLabelRule, SpeakerRegistry};
pub use timestamp::{format_timestamp, parse_timestamp};

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::TranscriptSegment;

/// A strategy that turns raw transcript content into ordered segments
///
/// Parsers never fail: lines they cannot interpret are skipped.
pub trait TranscriptParser {
    fn parse(&self, content: &str) -> Vec<TranscriptSegment>;
}

/// Transcript layouts understood by the ingestion stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// WebVTT-style cues with inline voice tags
    CueBlock,
    /// SRT-style numbered cue blocks
    IndexedCue,
    /// Timestamped lines in one of several loose conventions
    Freeform,
}

impl TranscriptFormat {
    /// Format implied by a file extension, if any
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "vtt" => Some(Self::CueBlock),
            "srt" => Some(Self::IndexedCue),
            _ => None,
        }
    }

    /// Guess the format from the content itself
    pub fn sniff(content: &str) -> Self {
        static INDEXED_CUE: OnceLock<Regex> = OnceLock::new();
        let indexed_cue = INDEXED_CUE
            .get_or_init(|| Regex::new(r"(?m)^\d+\s*\n[\d:,]+\s*-->").expect("valid regex"));

        if content.trim().starts_with("WEBVTT") {
            Self::CueBlock
        } else if indexed_cue.is_match(content) {
            Self::IndexedCue
        } else {
            Self::Freeform
        }
    }

    /// Extension hint first, then content sniffing
    pub fn detect(path: Option<&Path>, content: &str) -> Self {
        path.and_then(Self::from_extension)
            .unwrap_or_else(|| Self::sniff(content))
    }

    pub fn parser(&self) -> Box<dyn TranscriptParser> {
        match self {
            Self::CueBlock => Box::new(CueBlockParser),
            Self::IndexedCue => Box::new(IndexedCueParser),
            Self::Freeform => Box::new(FreeformParser::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CueBlock => "cue-block",
            Self::IndexedCue => "indexed-cue",
            Self::Freeform => "freeform",
        }
    }
}

/// Strip a byte-order mark and normalize line endings to `\n`
pub fn normalize_content(content: &str) -> String {
    content
        .trim_start_matches('\u{FEFF}')
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Match an `A --> B` cue timing line at the start of `line`
pub fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    static TIMING_LINE: OnceLock<Regex> = OnceLock::new();
    let timing = TIMING_LINE.get_or_init(|| {
        Regex::new(r"^([\d:,.]+)\s*-->\s*([\d:,.]+)").expect("valid regex")
    });
    let caps = timing.captures(line)?;
    Some((parse_timestamp(&caps[1]), parse_timestamp(&caps[2])))
}

/// Remove markup tags such as `<i>`, `</v>` or `<c.yellow>`
pub fn strip_tags(text: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"));
    tag.replace_all(text, "").into_owned()
}
