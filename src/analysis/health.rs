use crate::models::{
    CallType, Confidence, DetectedPattern, HealthIndicator, HealthIndicators, IndicatorStatus,
    Question, QuestionType, SpeakerAnalysis,
};

use crate::models::IndicatorStatus::{AttentionNeeded, Good, Moderate, NeedsAttention, Positive};

/// Share of talk time the top speaker must reach in a healthy discovery call
const DISCOVERY_TOP_SPEAKER_PCT: f64 = 40.0;
/// Minimum fraction of open-ended questions in a discovery call
const DISCOVERY_OPEN_QUESTION_RATIO: f64 = 0.4;

/// Everything the health rules look at
#[derive(Debug, Clone, Copy)]
pub struct HealthInputs<'a> {
    pub speaker_analysis: &'a SpeakerAnalysis,
    pub questions: &'a [Question],
    pub pain_points: &'a [DetectedPattern],
    pub objections: &'a [DetectedPattern],
    pub buying_signals: &'a [DetectedPattern],
    pub action_items: &'a [DetectedPattern],
}

/// Score the call against the expectations of its type
pub fn generate_health_indicators(inputs: &HealthInputs<'_>, call_type: CallType) -> HealthIndicators {
    HealthIndicators {
        talk_ratio: talk_ratio(inputs.speaker_analysis, call_type),
        question_quality: question_quality(inputs.questions, call_type),
        pain_discovery: pain_discovery(inputs.pain_points, call_type),
        objections: objections(inputs.objections),
        buying_intent: buying_intent(inputs.buying_signals),
        next_steps: Some(next_steps(inputs.action_items)),
    }
}

fn talk_ratio(speaker_analysis: &SpeakerAnalysis, call_type: CallType) -> Option<HealthIndicator> {
    let speakers = &speaker_analysis.speakers;
    if speakers.len() < 2 {
        return None;
    }
    let top_pct = speakers
        .iter()
        .map(|s| s.talk_time_pct)
        .fold(f64::NEG_INFINITY, f64::max);

    match call_type {
        CallType::Discovery if top_pct < DISCOVERY_TOP_SPEAKER_PCT => Some(HealthIndicator::new(
            NeedsAttention,
            "Rep may be talking too much. In discovery calls, aim for prospect to talk 60%+ of the time.",
        )),
        CallType::Discovery => Some(HealthIndicator::new(
            Good,
            format!("Good balance with top speaker at {:.1}%", top_pct),
        )),
        CallType::Demo => Some(HealthIndicator::new(
            Good,
            format!("Demo talk distribution: {:.1}% for primary speaker", top_pct),
        )),
        CallType::Checkin => None,
    }
}

fn question_quality(questions: &[Question], call_type: CallType) -> Option<HealthIndicator> {
    if questions.is_empty() {
        return None;
    }
    let open = questions
        .iter()
        .filter(|q| q.question_type == QuestionType::OpenDiscovery)
        .count();
    let open_ratio = open as f64 / questions.len() as f64;

    let indicator = if call_type == CallType::Discovery && open_ratio < DISCOVERY_OPEN_QUESTION_RATIO {
        HealthIndicator::new(
            NeedsAttention,
            format!(
                "Only {:.0}% open-ended questions. Consider more discovery questions.",
                open_ratio * 100.0
            ),
        )
    } else {
        HealthIndicator::new(
            Good,
            format!(
                "{:.0}% open-ended, {:.0}% closed questions",
                open_ratio * 100.0,
                (1.0 - open_ratio) * 100.0
            ),
        )
    };
    Some(indicator)
}

fn pain_discovery(pain_points: &[DetectedPattern], call_type: CallType) -> Option<HealthIndicator> {
    if call_type != CallType::Discovery {
        return None;
    }
    let indicator = match pain_points.len() {
        0 => HealthIndicator::new(
            NeedsAttention,
            "No clear pain points identified. Dig deeper into challenges.",
        ),
        1 => HealthIndicator::new(Moderate, "One pain point identified. Consider exploring more."),
        n => HealthIndicator::new(Good, format!("Identified {} pain points", n)),
    };
    Some(indicator)
}

fn objections(objections: &[DetectedPattern]) -> Option<HealthIndicator> {
    if objections.is_empty() {
        return None;
    }
    Some(HealthIndicator::new(
        AttentionNeeded,
        format!(
            "{} objection(s) detected. Review handling in transcript.",
            objections.len()
        ),
    ))
}

fn buying_intent(signals: &[DetectedPattern]) -> Option<HealthIndicator> {
    if signals.is_empty() {
        return None;
    }
    let high = signals
        .iter()
        .filter(|s| s.confidence == Confidence::High)
        .count();
    Some(HealthIndicator::new(
        Positive,
        format!(
            "{} buying signals detected ({} high confidence)",
            signals.len(),
            high
        ),
    ))
}

fn next_steps(action_items: &[DetectedPattern]) -> HealthIndicator {
    if action_items.is_empty() {
        HealthIndicator::new(
            NeedsAttention,
            "No clear next steps identified. Ensure follow-up is defined.",
        )
    } else {
        HealthIndicator::new(Good, format!("{} action items identified", action_items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatternType, SpeakerMetrics};

    fn speaker(id: &str, pct: f64) -> SpeakerMetrics {
        SpeakerMetrics {
            speaker_id: id.to_string(),
            speaker_name: None,
            talk_time_seconds: pct,
            talk_time_pct: pct,
            word_count: 10,
            speaking_pace_wpm: 120.0,
            turn_count: 1,
            avg_turn_length_seconds: pct,
        }
    }

    fn pattern(pattern_type: PatternType, confidence: Confidence) -> DetectedPattern {
        DetectedPattern {
            pattern_type,
            text: "text".to_string(),
            timestamp_seconds: 0.0,
            timestamp: "00:00:00".to_string(),
            speaker_id: None,
            speaker_name: None,
            confidence,
            matched_phrase: "text".to_string(),
        }
    }

    fn question(question_type: QuestionType) -> Question {
        Question {
            text: "?".to_string(),
            timestamp_seconds: 0.0,
            timestamp: "00:00:00".to_string(),
            speaker_id: None,
            speaker_name: None,
            question_type,
        }
    }

    fn inputs<'a>(
        speaker_analysis: &'a SpeakerAnalysis,
        questions: &'a [Question],
        pain_points: &'a [DetectedPattern],
    ) -> HealthInputs<'a> {
        HealthInputs {
            speaker_analysis,
            questions,
            pain_points,
            objections: &[],
            buying_signals: &[],
            action_items: &[],
        }
    }

    #[test]
    fn test_empty_discovery_call() {
        let analysis = SpeakerAnalysis::default();
        let indicators = generate_health_indicators(&inputs(&analysis, &[], &[]), CallType::Discovery);

        assert!(indicators.talk_ratio.is_none());
        assert!(indicators.question_quality.is_none());
        assert_eq!(indicators.pain_discovery.unwrap().status, NeedsAttention);
        assert!(indicators.objections.is_none());
        assert!(indicators.buying_intent.is_none());
        assert_eq!(indicators.next_steps.unwrap().status, NeedsAttention);
    }

    #[test]
    fn test_talk_ratio_by_call_type() {
        let balanced = SpeakerAnalysis::new(
            vec![speaker("speaker_1", 35.0), speaker("speaker_2", 33.0), speaker("speaker_3", 32.0)],
            3,
        );
        let dominated = SpeakerAnalysis::new(
            vec![speaker("speaker_1", 57.1), speaker("speaker_2", 42.9)],
            2,
        );

        let indicators = generate_health_indicators(&inputs(&balanced, &[], &[]), CallType::Discovery);
        assert_eq!(indicators.talk_ratio.unwrap().status, NeedsAttention);

        let indicators = generate_health_indicators(&inputs(&dominated, &[], &[]), CallType::Discovery);
        let talk = indicators.talk_ratio.unwrap();
        assert_eq!(talk.status, Good);
        assert_eq!(talk.message, "Good balance with top speaker at 57.1%");

        let indicators = generate_health_indicators(&inputs(&balanced, &[], &[]), CallType::Demo);
        assert_eq!(indicators.talk_ratio.unwrap().status, Good);

        let indicators = generate_health_indicators(&inputs(&dominated, &[], &[]), CallType::Checkin);
        assert!(indicators.talk_ratio.is_none());
    }

    #[test]
    fn test_question_quality() {
        let analysis = SpeakerAnalysis::default();
        let questions = vec![
            question(QuestionType::OpenDiscovery),
            question(QuestionType::ClosedConfirmation),
            question(QuestionType::ClosedConfirmation),
        ];

        let indicators = generate_health_indicators(&inputs(&analysis, &questions, &[]), CallType::Discovery);
        let quality = indicators.question_quality.unwrap();
        assert_eq!(quality.status, NeedsAttention);
        assert_eq!(quality.message, "Only 33% open-ended questions. Consider more discovery questions.");

        let indicators = generate_health_indicators(&inputs(&analysis, &questions, &[]), CallType::Demo);
        let quality = indicators.question_quality.unwrap();
        assert_eq!(quality.status, Good);
        assert_eq!(quality.message, "33% open-ended, 67% closed questions");
    }

    #[test]
    fn test_pain_discovery_levels() {
        let analysis = SpeakerAnalysis::default();
        let one = vec![pattern(PatternType::PainPoint, Confidence::Medium)];
        let two = vec![
            pattern(PatternType::PainPoint, Confidence::High),
            pattern(PatternType::PainPoint, Confidence::Low),
        ];

        let indicators = generate_health_indicators(&inputs(&analysis, &[], &one), CallType::Discovery);
        assert_eq!(indicators.pain_discovery.unwrap().status, Moderate);

        let indicators = generate_health_indicators(&inputs(&analysis, &[], &two), CallType::Discovery);
        let pain = indicators.pain_discovery.unwrap();
        assert_eq!(pain.status, Good);
        assert_eq!(pain.message, "Identified 2 pain points");

        let indicators = generate_health_indicators(&inputs(&analysis, &[], &two), CallType::Demo);
        assert!(indicators.pain_discovery.is_none());
    }

    #[test]
    fn test_objections_signals_and_next_steps() {
        let analysis = SpeakerAnalysis::default();
        let objections = vec![pattern(PatternType::Objection, Confidence::High)];
        let signals = vec![
            pattern(PatternType::BuyingSignal, Confidence::High),
            pattern(PatternType::BuyingSignal, Confidence::Low),
        ];
        let actions = vec![pattern(PatternType::ActionItem, Confidence::High)];

        let indicators = generate_health_indicators(
            &HealthInputs {
                speaker_analysis: &analysis,
                questions: &[],
                pain_points: &[],
                objections: &objections,
                buying_signals: &signals,
                action_items: &actions,
            },
            CallType::Checkin,
        );

        assert_eq!(indicators.objections.unwrap().status, AttentionNeeded);
        let intent = indicators.buying_intent.unwrap();
        assert_eq!(intent.status, Positive);
        assert_eq!(intent.message, "2 buying signals detected (1 high confidence)");
        let next = indicators.next_steps.unwrap();
        assert_eq!(next.status, Good);
        assert_eq!(next.message, "1 action items identified");
    }
}
