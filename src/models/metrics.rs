use serde::{Deserialize, Serialize};

/// Talk statistics for a single speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerMetrics {
    pub speaker_id: String,
    pub speaker_name: Option<String>,
    pub talk_time_seconds: f64,
    pub talk_time_pct: f64,
    pub word_count: usize,
    pub speaking_pace_wpm: f64,
    pub turn_count: usize,
    pub avg_turn_length_seconds: f64,
}

/// Speaker section of the session index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakerAnalysis {
    pub total_speakers: usize,
    pub total_turns: usize,
    pub speakers: Vec<SpeakerMetrics>,
}

impl SpeakerAnalysis {
    pub fn new(speakers: Vec<SpeakerMetrics>, total_turns: usize) -> Self {
        Self {
            total_speakers: speakers.len(),
            total_turns,
            speakers,
        }
    }

    /// Number of speakers that carry a human-readable name
    pub fn named_speaker_count(&self) -> usize {
        self.speakers
            .iter()
            .filter(|s| s.speaker_name.is_some())
            .count()
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
