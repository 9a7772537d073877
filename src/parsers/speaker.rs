use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::TranscriptSegment;

/// Acceptance rule for a leading `Name:` prefix as a speaker label
///
/// Ordinary sentences often contain a colon ("Note: the build is red"), so a
/// candidate is only treated as a name when it is short and, for subtitle
/// formats, free of digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakerLabelRule {
    /// Maximum number of whitespace-separated tokens in a name
    pub max_tokens: usize,
    /// Whether digits may appear in a name
    pub allow_digits: bool,
}

impl SpeakerLabelRule {
    /// Rule for names inside subtitle cues
    pub const CUE: Self = Self {
        max_tokens: 4,
        allow_digits: false,
    };

    /// Rule for names embedded after a timestamp in freeform lines
    pub const FREEFORM: Self = Self {
        max_tokens: 4,
        allow_digits: true,
    };

    /// Check whether a candidate string is acceptable as a speaker name
    pub fn accepts(&self, candidate: &str) -> bool {
        let tokens = candidate.split_whitespace().count();
        if tokens == 0 || tokens > self.max_tokens {
            return false;
        }
        self.allow_digits || !candidate.chars().any(char::is_numeric)
    }
}

fn leading_label_regex() -> &'static Regex {
    static LEADING_LABEL: OnceLock<Regex> = OnceLock::new();
    LEADING_LABEL.get_or_init(|| Regex::new(r"^([^:]+):\s*(.+)$").expect("valid regex"))
}

/// Split `Name: text` into its name and text when the name passes `rule`
pub fn split_leading_label<'a>(line: &'a str, rule: &SpeakerLabelRule) -> Option<(&'a str, &'a str)> {
    let caps = leading_label_regex().captures(line)?;
    let name = caps.get(1)?.as_str().trim();
    let text = caps.get(2)?.as_str().trim();
    rule.accepts(name).then_some((name, text))
}

/// Maps free-text speaker labels to stable per-document ids
///
/// Labels are matched exactly (case-sensitive) and numbered in first-seen order.
#[derive(Debug, Default)]
pub struct SpeakerRegistry {
    ids: HashMap<String, String>,
}

impl SpeakerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id for a label, assigning the next sequential id if unseen
    pub fn resolve(&mut self, label: &str) -> String {
        if let Some(id) = self.ids.get(label) {
            return id.clone();
        }
        let id = format!("speaker_{}", self.ids.len() + 1);
        self.ids.insert(label.to_string(), id.clone());
        id
    }

    /// Number of distinct labels seen so far
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Build a segment, attaching the resolved speaker when a label is present
    pub fn segment(
        &mut self,
        start_seconds: f64,
        end_seconds: f64,
        text: String,
        label: Option<&str>,
    ) -> TranscriptSegment {
        let segment = TranscriptSegment::new(start_seconds, end_seconds, text);
        match label {
            Some(name) => {
                let id = self.resolve(name);
                segment.with_speaker(id, name)
            }
            None => segment,
        }
    }
}
