pub mod health;
pub mod patterns;
pub mod questions;

pub use health::{generate_health_indicators, HealthInputs};
pub use patterns::{detect_pattern, rules, PatternRule, Utterance};
pub use questions::classify_question;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::io::write_json;
use crate::models::{
    round_to, CallMetadata, CallReview, CallType, DetectedPattern, FrameRecord, KeyMetrics,
    PatternSummary, PatternType, Question, QuestionSummary, RatedPatternSummary, ReviewSummary,
    SessionIndex, TranscriptAnalysis, VisualAnalysis, NO_TRANSCRIPT,
};
use crate::parsers::format_timestamp;

/// Version tag written into every review
pub const ANALYSIS_VERSION: &str = "1.0";

/// File name of the review written next to the session index
pub const REVIEW_FILE_NAME: &str = "call_review.json";

/// Patterns and questions found across a session's frames
#[derive(Debug, Clone, Default)]
pub struct FrameAnalysis {
    pub pain_points: Vec<DetectedPattern>,
    pub objections: Vec<DetectedPattern>,
    pub buying_signals: Vec<DetectedPattern>,
    pub action_items: Vec<DetectedPattern>,
    pub questions: Vec<Question>,
}

impl FrameAnalysis {
    fn patterns_mut(&mut self, pattern_type: PatternType) -> &mut Vec<DetectedPattern> {
        match pattern_type {
            PatternType::PainPoint => &mut self.pain_points,
            PatternType::Objection => &mut self.objections,
            PatternType::BuyingSignal => &mut self.buying_signals,
            PatternType::ActionItem => &mut self.action_items,
        }
    }
}

const PATTERN_TYPES: [PatternType; 4] = [
    PatternType::PainPoint,
    PatternType::Objection,
    PatternType::BuyingSignal,
    PatternType::ActionItem,
];

/// Run the pattern tables and question classifier over frame transcripts
///
/// Consecutive frames often share a segment, so each distinct text is only
/// analyzed the first time it appears.
pub fn analyze_frames(frames: &[FrameRecord]) -> FrameAnalysis {
    let mut analysis = FrameAnalysis::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for frame in frames {
        let text = frame.transcript_segment.as_str();
        if text.is_empty() || text == NO_TRANSCRIPT || !seen.insert(text) {
            continue;
        }

        let utterance = Utterance {
            text,
            timestamp_seconds: frame.timestamp_seconds,
            speaker_id: frame.speaker_id.as_deref(),
            speaker_name: frame.speaker_name.as_deref(),
        };

        for pattern_type in PATTERN_TYPES {
            if let Some(found) = detect_pattern(&utterance, pattern_type) {
                debug!(
                    "{:?} at {}: {:?}",
                    pattern_type, found.timestamp, found.matched_phrase
                );
                analysis.patterns_mut(pattern_type).push(found);
            }
        }

        if let Some(question_type) = classify_question(text) {
            analysis.questions.push(Question {
                text: text.to_string(),
                timestamp_seconds: frame.timestamp_seconds,
                timestamp: format_timestamp(frame.timestamp_seconds),
                speaker_id: frame.speaker_id.clone(),
                speaker_name: frame.speaker_name.clone(),
                question_type,
            });
        }
    }

    analysis
}

/// Build the full call review for a processed session
pub fn generate_call_review(index: &SessionIndex, call_type: CallType) -> CallReview {
    let analysis = analyze_frames(&index.frames);

    let call_health_indicators = generate_health_indicators(
        &HealthInputs {
            speaker_analysis: &index.speaker_analysis,
            questions: &analysis.questions,
            pain_points: &analysis.pain_points,
            objections: &analysis.objections,
            buying_signals: &analysis.buying_signals,
            action_items: &analysis.action_items,
        },
        call_type,
    );

    let key_metrics = KeyMetrics {
        duration_minutes: round_to(index.duration_seconds / 60.0, 1),
        total_speakers: index.speaker_analysis.total_speakers,
        total_turns: index.speaker_analysis.total_turns,
        questions_asked: analysis.questions.len(),
        pain_points_found: analysis.pain_points.len(),
        objections_raised: analysis.objections.len(),
        buying_signals_detected: analysis.buying_signals.len(),
        action_items_identified: analysis.action_items.len(),
    };

    let mut by_type = BTreeMap::new();
    for question in &analysis.questions {
        *by_type.entry(question.question_type).or_insert(0) += 1;
    }

    let FrameAnalysis {
        pain_points,
        objections,
        buying_signals,
        action_items,
        questions,
    } = analysis;

    CallReview {
        call_metadata: CallMetadata {
            video_file: index.video_file.clone(),
            duration_seconds: index.duration_seconds,
            call_type,
            analysis_version: ANALYSIS_VERSION.to_string(),
        },
        speaker_analysis: index.speaker_analysis.clone(),
        transcript_analysis: TranscriptAnalysis {
            questions_asked: QuestionSummary {
                total: questions.len(),
                by_type,
                details: questions,
            },
            pain_points_identified: RatedPatternSummary::from_patterns(pain_points),
            objections_detected: RatedPatternSummary::from_patterns(objections),
            buying_signals: RatedPatternSummary::from_patterns(buying_signals),
            action_items: PatternSummary {
                total: action_items.len(),
                details: action_items,
            },
        },
        visual_analysis: VisualAnalysis {
            total_frames: index.frames.len(),
            engagement_timeline: Vec::new(),
            notable_reactions: Vec::new(),
        },
        summary: ReviewSummary {
            key_metrics,
            call_health_indicators,
        },
    }
}

/// Persist the review as `call_review.json` inside `output_dir`
pub fn write_call_review(review: &CallReview, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(REVIEW_FILE_NAME);
    info!("Writing call review to {:?}", path);
    write_json(review, &path).context("Failed to write call review")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, IndicatorStatus, QuestionType, SpeakerAnalysis};

    fn frame(t: f64, text: &str, speaker: Option<(&str, &str)>) -> FrameRecord {
        FrameRecord {
            timestamp: format_timestamp(t),
            timestamp_seconds: t,
            screenshot: format!("frame_{:04}.jpg", (t / 5.0) as usize + 1),
            transcript_segment: text.to_string(),
            speaker_id: speaker.map(|(id, _)| id.to_string()),
            speaker_name: speaker.map(|(_, name)| name.to_string()),
        }
    }

    fn session(frames: Vec<FrameRecord>) -> SessionIndex {
        SessionIndex {
            video_file: "acme.mp4".to_string(),
            transcript_file: "acme.vtt".to_string(),
            duration_seconds: 754.0,
            total_frames: frames.len(),
            frame_interval_seconds: 5.0,
            scene_detection_threshold: 0.3,
            speaker_analysis: SpeakerAnalysis::default(),
            frames,
        }
    }

    #[test]
    fn test_analyze_frames_skips_repeats_and_sentinel() {
        let rep = Some(("speaker_1", "Sam"));
        let frames = vec![
            frame(0.0, "How does your team track renewals today?", rep),
            frame(5.0, "How does your team track renewals today?", rep),
            frame(10.0, NO_TRANSCRIPT, None),
            frame(15.0, "", None),
        ];

        let analysis = analyze_frames(&frames);

        assert_eq!(analysis.questions.len(), 1);
        assert_eq!(analysis.questions[0].question_type, QuestionType::OpenDiscovery);
        assert_eq!(analysis.questions[0].speaker_name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_one_text_can_hit_several_tables() {
        let frames = vec![frame(
            30.0,
            "Our biggest challenge is budget, can you send pricing?",
            Some(("speaker_2", "Dana")),
        )];

        let analysis = analyze_frames(&frames);

        assert_eq!(analysis.pain_points.len(), 1);
        assert_eq!(analysis.objections.len(), 1);
        assert_eq!(analysis.buying_signals.len(), 1);
        assert_eq!(analysis.questions.len(), 1);
        assert_eq!(analysis.objections[0].matched_phrase, "budget");
    }

    #[test]
    fn test_generate_call_review() {
        let prospect = Some(("speaker_2", "Dana"));
        let frames = vec![
            frame(0.0, "What does your current workflow look like?", Some(("speaker_1", "Sam"))),
            frame(5.0, "We struggle with manual data entry.", prospect),
            frame(10.0, "It's frustrating and too slow.", prospect),
            frame(15.0, "I'll send a recap and let's schedule a demo.", Some(("speaker_1", "Sam"))),
            frame(20.0, NO_TRANSCRIPT, None),
        ];

        let review = generate_call_review(&session(frames), CallType::Discovery);

        assert_eq!(review.call_metadata.analysis_version, "1.0");
        assert_eq!(review.call_metadata.call_type, CallType::Discovery);
        assert_eq!(review.visual_analysis.total_frames, 5);

        let transcript = &review.transcript_analysis;
        assert_eq!(transcript.questions_asked.total, 1);
        assert_eq!(transcript.questions_asked.by_type[&QuestionType::OpenDiscovery], 1);
        assert_eq!(transcript.pain_points_identified.total, 2);
        assert_eq!(transcript.pain_points_identified.high_confidence, 2);
        assert_eq!(transcript.action_items.total, 1);
        assert_eq!(transcript.action_items.details[0].confidence, Confidence::High);

        let metrics = &review.summary.key_metrics;
        assert_eq!(metrics.duration_minutes, 12.6);
        assert_eq!(metrics.pain_points_found, 2);

        let health = &review.summary.call_health_indicators;
        assert_eq!(health.pain_discovery.as_ref().unwrap().status, IndicatorStatus::Good);
        assert_eq!(health.next_steps.as_ref().unwrap().status, IndicatorStatus::Good);
        assert!(health.objections.is_none());
    }

    #[test]
    fn test_review_json_shape() {
        let review = generate_call_review(&session(vec![]), CallType::Demo);
        let json = serde_json::to_value(&review).unwrap();

        assert_eq!(json["call_metadata"]["call_type"], "demo");
        assert_eq!(json["transcript_analysis"]["questions_asked"]["by_type"], serde_json::json!({}));
        assert!(json["transcript_analysis"]["action_items"].get("high_confidence").is_none());
        assert_eq!(json["visual_analysis"]["engagement_timeline"], serde_json::json!([]));
        assert_eq!(
            json["summary"]["call_health_indicators"]["next_steps"]["status"],
            "needs_attention"
        );
    }

    #[test]
    fn test_write_call_review() {
        let dir = tempfile::tempdir().unwrap();
        let review = generate_call_review(&session(vec![]), CallType::Checkin);

        let path = write_call_review(&review, dir.path()).unwrap();

        assert_eq!(path, dir.path().join("call_review.json"));
        let loaded: CallReview =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, review);
    }
}
