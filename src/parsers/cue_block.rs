use std::sync::OnceLock;

use regex::Regex;

use super::speaker::{split_leading_label, SpeakerLabelRule, SpeakerRegistry};
use super::{parse_timing_line, strip_tags, TranscriptParser};
use crate::models::TranscriptSegment;

fn voice_tag_regex() -> &'static Regex {
    static VOICE_TAG: OnceLock<Regex> = OnceLock::new();
    VOICE_TAG.get_or_init(|| {
        Regex::new(r"^<v(?:\.[^>\s]*)?\s+([^>]+)>(.*)$").expect("valid regex")
    })
}

/// Parser for WebVTT-style transcripts
///
/// A cue starts at an `A --> B` line and runs until a blank line or the next
/// timing line. Speakers come from `<v Name>` voice tags or a leading
/// `Name:` prefix; the first speaker found in a cue wins.
pub struct CueBlockParser;

impl TranscriptParser for CueBlockParser {
    fn parse(&self, content: &str) -> Vec<TranscriptSegment> {
        let lines: Vec<&str> = content.trim().lines().collect();
        let mut registry = SpeakerRegistry::new();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let Some((start, end)) = parse_timing_line(lines[i].trim()) else {
                i += 1;
                continue;
            };
            i += 1;

            let mut text_lines: Vec<String> = Vec::new();
            let mut cue_speaker: Option<String> = None;

            while i < lines.len() {
                let line = lines[i].trim();
                if line.is_empty() || parse_timing_line(line).is_some() {
                    break;
                }
                if !is_cue_identifier(line) && !line.starts_with("NOTE") {
                    let (speaker, text) = split_cue_line(line);
                    if cue_speaker.is_none() {
                        cue_speaker = speaker;
                    }
                    if !text.is_empty() {
                        text_lines.push(text);
                    }
                }
                i += 1;
            }

            if text_lines.is_empty() {
                continue;
            }

            segments.push(registry.segment(start, end, text_lines.join(" "), cue_speaker.as_deref()));
        }

        segments
    }
}

/// Numeric cue identifiers carry no text
fn is_cue_identifier(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

/// Extract an optional speaker and the cleaned text from one cue line
fn split_cue_line(line: &str) -> (Option<String>, String) {
    if let Some(caps) = voice_tag_regex().captures(line) {
        let speaker = caps[1].trim();
        let text = strip_tags(&caps[2]).trim().to_string();
        let speaker = (!speaker.is_empty()).then(|| speaker.to_string());
        return (speaker, text);
    }

    let cleaned = strip_tags(line);
    let cleaned = cleaned.trim();
    match split_leading_label(cleaned, &SpeakerLabelRule::CUE) {
        Some((name, text)) => (Some(name.to_string()), text.to_string()),
        None => (None, cleaned.to_string()),
    }
}
