use std::sync::OnceLock;

use regex::Regex;

use super::speaker::{split_leading_label, SpeakerLabelRule, SpeakerRegistry};
use super::{parse_timing_line, strip_tags, TranscriptParser};
use crate::models::TranscriptSegment;

fn block_separator_regex() -> &'static Regex {
    static BLOCK_SEPARATOR: OnceLock<Regex> = OnceLock::new();
    BLOCK_SEPARATOR.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid regex"))
}

/// Parser for SRT-style transcripts
///
/// Blocks are separated by blank lines. The first timing line of a block
/// anchors the segment and every following line is text.
pub struct IndexedCueParser;

impl TranscriptParser for IndexedCueParser {
    fn parse(&self, content: &str) -> Vec<TranscriptSegment> {
        let mut registry = SpeakerRegistry::new();
        let mut segments = Vec::new();

        for block in block_separator_regex().split(content.trim()) {
            let lines: Vec<&str> = block.trim().lines().map(str::trim).collect();
            if lines.len() < 2 {
                continue;
            }

            let Some((timing_index, (start, end))) = lines
                .iter()
                .enumerate()
                .find_map(|(i, line)| parse_timing_line(line).map(|timing| (i, timing)))
            else {
                continue;
            };

            let mut block_speaker: Option<String> = None;
            let mut cleaned_lines: Vec<String> = Vec::new();

            for line in &lines[timing_index + 1..] {
                let line = strip_tags(line);
                let line = line.trim();
                match split_leading_label(line, &SpeakerLabelRule::CUE) {
                    Some((name, text)) => {
                        if block_speaker.is_none() {
                            block_speaker = Some(name.to_string());
                        }
                        cleaned_lines.push(text.to_string());
                    }
                    None => cleaned_lines.push(line.to_string()),
                }
            }

            let text = cleaned_lines.join(" ").trim().to_string();
            if text.is_empty() {
                continue;
            }

            segments.push(registry.segment(start, end, text, block_speaker.as_deref()));
        }

        segments
    }
}
