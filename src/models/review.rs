use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SpeakerAnalysis;

/// Category of a rule-detected conversational pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    PainPoint,
    Objection,
    BuyingSignal,
    ActionItem,
}

/// How strongly a matched phrase indicates its pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    OpenDiscovery,
    ClosedConfirmation,
    Clarifying,
    Rhetorical,
}

/// Kind of call being reviewed; drives the health indicator thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Discovery,
    Demo,
    Checkin,
}

impl std::fmt::Display for CallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CallType::Discovery => "discovery",
            CallType::Demo => "demo",
            CallType::Checkin => "checkin",
        };
        f.write_str(name)
    }
}

/// A pattern matched in one frame's transcript text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub pattern_type: PatternType,
    pub text: String,
    pub timestamp_seconds: f64,
    pub timestamp: String,
    pub speaker_id: Option<String>,
    pub speaker_name: Option<String>,
    pub confidence: Confidence,
    pub matched_phrase: String,
}

/// A question found in the transcript with its classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub timestamp_seconds: f64,
    pub timestamp: String,
    pub speaker_id: Option<String>,
    pub speaker_name: Option<String>,
    pub question_type: QuestionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorStatus {
    Good,
    Positive,
    Moderate,
    NeedsAttention,
    AttentionNeeded,
}

impl IndicatorStatus {
    /// Single-character marker used in console summaries
    pub fn marker(&self) -> char {
        match self {
            IndicatorStatus::Good | IndicatorStatus::Positive => '+',
            IndicatorStatus::Moderate => '~',
            IndicatorStatus::NeedsAttention | IndicatorStatus::AttentionNeeded => '!',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthIndicator {
    pub status: IndicatorStatus,
    pub message: String,
}

impl HealthIndicator {
    pub fn new(status: IndicatorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Call-health indicators; indicators that do not apply are omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthIndicators {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub talk_ratio: Option<HealthIndicator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_quality: Option<HealthIndicator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_discovery: Option<HealthIndicator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objections: Option<HealthIndicator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buying_intent: Option<HealthIndicator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<HealthIndicator>,
}

impl HealthIndicators {
    /// Present indicators in document order, keyed by name
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &HealthIndicator)> {
        [
            ("talk_ratio", &self.talk_ratio),
            ("question_quality", &self.question_quality),
            ("pain_discovery", &self.pain_discovery),
            ("objections", &self.objections),
            ("buying_intent", &self.buying_intent),
            ("next_steps", &self.next_steps),
        ]
        .into_iter()
        .filter_map(|(name, indicator)| indicator.as_ref().map(|i| (name, i)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallMetadata {
    pub video_file: String,
    pub duration_seconds: f64,
    pub call_type: CallType,
    pub analysis_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub total: usize,
    pub by_type: BTreeMap<QuestionType, usize>,
    pub details: Vec<Question>,
}

/// Pattern list with a count of its high-confidence matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedPatternSummary {
    pub total: usize,
    pub high_confidence: usize,
    pub details: Vec<DetectedPattern>,
}

impl RatedPatternSummary {
    pub fn from_patterns(details: Vec<DetectedPattern>) -> Self {
        Self {
            total: details.len(),
            high_confidence: details
                .iter()
                .filter(|p| p.confidence == Confidence::High)
                .count(),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub total: usize,
    pub details: Vec<DetectedPattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptAnalysis {
    pub questions_asked: QuestionSummary,
    pub pain_points_identified: RatedPatternSummary,
    pub objections_detected: RatedPatternSummary,
    pub buying_signals: RatedPatternSummary,
    pub action_items: PatternSummary,
}

/// Placeholder for visual review filled in by a later reviewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualAnalysis {
    pub total_frames: usize,
    pub engagement_timeline: Vec<serde_json::Value>,
    pub notable_reactions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub duration_minutes: f64,
    pub total_speakers: usize,
    pub total_turns: usize,
    pub questions_asked: usize,
    pub pain_points_found: usize,
    pub objections_raised: usize,
    pub buying_signals_detected: usize,
    pub action_items_identified: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub key_metrics: KeyMetrics,
    pub call_health_indicators: HealthIndicators,
}

/// Pattern-analysis report generated from a session index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallReview {
    pub call_metadata: CallMetadata,
    pub speaker_analysis: SpeakerAnalysis,
    pub transcript_analysis: TranscriptAnalysis,
    pub visual_analysis: VisualAnalysis,
    pub summary: ReviewSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_markers() {
        assert_eq!(IndicatorStatus::Good.marker(), '+');
        assert_eq!(IndicatorStatus::Positive.marker(), '+');
        assert_eq!(IndicatorStatus::Moderate.marker(), '~');
        assert_eq!(IndicatorStatus::AttentionNeeded.marker(), '!');
    }

    #[test]
    fn test_health_indicators_iter_skips_missing() {
        let indicators = HealthIndicators {
            objections: Some(HealthIndicator::new(IndicatorStatus::AttentionNeeded, "1 objection")),
            next_steps: Some(HealthIndicator::new(IndicatorStatus::Good, "2 action items")),
            ..Default::default()
        };

        let names: Vec<_> = indicators.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["objections", "next_steps"]);

        let json = serde_json::to_value(&indicators).unwrap();
        assert!(json.get("talk_ratio").is_none());
        assert_eq!(json["objections"]["status"], "attention_needed");
    }

    #[test]
    fn test_call_type_display() {
        assert_eq!(CallType::Discovery.to_string(), "discovery");
        assert_eq!(CallType::Checkin.to_string(), "checkin");
    }
}
