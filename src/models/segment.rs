use serde::{Deserialize, Serialize};

/// Speaker id used for segments whose speaker could not be resolved
pub const UNKNOWN_SPEAKER: &str = "unknown";

/// A contiguous span of transcript text in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start_seconds: f64,
    /// End time in seconds, never before `start_seconds`
    pub end_seconds: f64,
    /// Cleaned text, non-empty
    pub text: String,
    /// Per-document speaker id (`speaker_1`, `speaker_2`, ...)
    pub speaker_id: Option<String>,
    /// Speaker label exactly as it appeared in the transcript
    pub speaker_name: Option<String>,
}

impl TranscriptSegment {
    pub fn new(start_seconds: f64, end_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            end_seconds: end_seconds.max(start_seconds),
            text: text.into(),
            speaker_id: None,
            speaker_name: None,
        }
    }

    pub fn with_speaker(mut self, speaker_id: impl Into<String>, speaker_name: impl Into<String>) -> Self {
        self.speaker_id = Some(speaker_id.into());
        self.speaker_name = Some(speaker_name.into());
        self
    }

    /// Duration of this segment in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.end_seconds - self.start_seconds).max(0.0)
    }

    /// Whether `timestamp` falls inside the segment, bounds included
    pub fn contains(&self, timestamp: f64) -> bool {
        self.start_seconds <= timestamp && timestamp <= self.end_seconds
    }

    /// Resolved speaker id, falling back to the unknown sentinel
    pub fn speaker_or_unknown(&self) -> &str {
        self.speaker_id.as_deref().unwrap_or(UNKNOWN_SPEAKER)
    }
}

/// One or more consecutive segments from the same speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    pub speaker_id: String,
    pub speaker_name: Option<String>,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
    pub word_count: usize,
}

impl SpeakerTurn {
    /// Duration of this turn in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}
