use std::sync::OnceLock;

use regex::Regex;

use super::speaker::{SpeakerLabelRule, SpeakerRegistry};
use super::{parse_timestamp, TranscriptParser};
use crate::models::TranscriptSegment;

/// Line conventions tried in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinePattern {
    /// `Name [ts]: text`
    SpeakerFirst,
    /// `[ts] Name: text`
    TimestampSpeaker,
    /// `[ts] text`
    TimestampOnly,
    /// `ts - text` or `ts: text`
    TimestampDash,
}

fn line_patterns() -> &'static [(Regex, LinePattern); 4] {
    static PATTERNS: OnceLock<[(Regex, LinePattern); 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (
                Regex::new(r"^([A-Za-z][^\[\]()]*?)\s*[\[(]([\d:,.]+)[\])]:\s*(.+)$")
                    .expect("valid regex"),
                LinePattern::SpeakerFirst,
            ),
            (
                Regex::new(r"^[\[(]([\d:,.]+)[\])]\s*([A-Za-z][^:]*?):\s*(.+)$")
                    .expect("valid regex"),
                LinePattern::TimestampSpeaker,
            ),
            (
                Regex::new(r"^[\[(]([\d:,.]+)[\])]\s*(.+)$").expect("valid regex"),
                LinePattern::TimestampOnly,
            ),
            (
                Regex::new(r"^([\d:,.]+)\s*[-:]\s*(.+)$").expect("valid regex"),
                LinePattern::TimestampDash,
            ),
        ]
    })
}

fn embedded_name_regex() -> &'static Regex {
    static EMBEDDED_NAME: OnceLock<Regex> = OnceLock::new();
    EMBEDDED_NAME.get_or_init(|| Regex::new(r"^([A-Za-z][^:]*?):\s*(.+)$").expect("valid regex"))
}

/// A line matched by one of the freeform conventions
#[derive(Debug, Clone, PartialEq)]
struct TimedLine {
    start_seconds: f64,
    text: String,
    speaker: Option<String>,
}

/// Parser for loosely formatted, line-per-utterance transcripts
///
/// Only start times are written in these files, so each segment ends where
/// the next one starts and the last one gets a fixed duration.
#[derive(Debug, Clone)]
pub struct FreeformParser {
    /// Duration assigned to the final segment, in seconds
    pub last_segment_seconds: f64,
}

impl Default for FreeformParser {
    fn default() -> Self {
        Self {
            last_segment_seconds: 10.0,
        }
    }
}

impl TranscriptParser for FreeformParser {
    fn parse(&self, content: &str) -> Vec<TranscriptSegment> {
        let timed_lines: Vec<TimedLine> = content
            .trim()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(match_line)
            .filter(|line| !line.text.is_empty())
            .collect();

        let mut registry = SpeakerRegistry::new();

        timed_lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let end = timed_lines
                    .get(i + 1)
                    .map(|next| next.start_seconds)
                    .unwrap_or(line.start_seconds + self.last_segment_seconds);
                registry.segment(
                    line.start_seconds,
                    end,
                    line.text.clone(),
                    line.speaker.as_deref(),
                )
            })
            .collect()
    }
}

/// Try each line convention in order, keeping the first match
fn match_line(line: &str) -> Option<TimedLine> {
    line_patterns().iter().find_map(|(regex, pattern)| {
        let caps = regex.captures(line)?;
        let timed = match pattern {
            LinePattern::SpeakerFirst => TimedLine {
                start_seconds: parse_timestamp(&caps[2]),
                text: caps[3].trim().to_string(),
                speaker: Some(caps[1].trim().to_string()),
            },
            LinePattern::TimestampSpeaker => TimedLine {
                start_seconds: parse_timestamp(&caps[1]),
                text: caps[3].trim().to_string(),
                speaker: Some(caps[2].trim().to_string()),
            },
            LinePattern::TimestampOnly | LinePattern::TimestampDash => {
                let (speaker, text) = split_embedded_name(caps[2].trim());
                TimedLine {
                    start_seconds: parse_timestamp(&caps[1]),
                    text,
                    speaker,
                }
            }
        };
        Some(timed)
    })
}

/// Pull a `Name:` prefix out of the text that follows a bare timestamp
fn split_embedded_name(text: &str) -> (Option<String>, String) {
    if let Some(caps) = embedded_name_regex().captures(text) {
        let name = caps[1].trim();
        if SpeakerLabelRule::FREEFORM.accepts(name) {
            return (Some(name.to_string()), caps[2].trim().to_string());
        }
    }
    (None, text.to_string())
}
