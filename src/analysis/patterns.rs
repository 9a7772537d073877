use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Confidence, DetectedPattern, PatternType};
use crate::parsers::format_timestamp;

use crate::models::Confidence::{High, Low, Medium};

const PAIN_POINT_RULES: &[(&str, Confidence)] = &[
    (r"\b(our biggest challenge|our main challenge|biggest problem)\b", High),
    (r"\b(we struggle with|we're struggling with|struggling to)\b", High),
    (r"\b(pain point|frustrating|frustration)\b", High),
    (r"\b(taking too long|takes too long|too slow)\b", Medium),
    (r"\b(difficult to|hard to|challenging to)\b", Medium),
    (r"\b(can't|cannot|unable to)\b", Medium),
    (r"\b(wasting time|waste of time|time consuming)\b", Medium),
    (r"\b(inefficient|inefficiency|bottleneck)\b", Medium),
    (r"\b(problem is|issue is|challenge is)\b", Medium),
    (r"\b(keeps breaking|breaks often|unreliable)\b", Medium),
    (r"\b(manual process|manually|by hand)\b", Low),
    (r"\b(outdated|legacy|old system)\b", Low),
    (r"\b(workaround|hack|band-aid)\b", Low),
];

const OBJECTION_RULES: &[(&str, Confidence)] = &[
    (r"\b(we've tried|we tried|tried before)\b", High),
    (r"\b(budget|too expensive|cost too much|can't afford)\b", High),
    (r"\b(not sure if|not convinced|skeptical)\b", High),
    (r"\b(need to think|think about it|consider it)\b", High),
    (r"\b(talk to my|check with my|run it by)\b", High),
    (r"\b(already have|currently using|existing solution)\b", Medium),
    (r"\b(too complex|too complicated|learning curve)\b", Medium),
    (r"\b(don't have time|no bandwidth|too busy)\b", Medium),
    (r"\b(not a priority|lower priority|back burner)\b", Medium),
    (r"\b(contract|locked in|commitment)\b", Medium),
    (r"\b(security concerns|compliance|regulations)\b", Medium),
    (r"\b(integration|doesn't integrate|compatibility)\b", Low),
    (r"\b(not now|maybe later|down the road)\b", Low),
];

const BUYING_SIGNAL_RULES: &[(&str, Confidence)] = &[
    (r"\b(what's the next step|next steps|how do we proceed)\b", High),
    (r"\b(how quickly|how soon|when can we|timeline)\b", High),
    (r"\b(what's the pricing|how much|cost|investment)\b", High),
    (r"\b(can you send|send me|share with me)\b", High),
    (r"\b(implementation|onboarding|getting started)\b", High),
    (r"\b(pilot|trial|proof of concept|poc)\b", High),
    (r"\b(decision maker|who else|stakeholder)\b", Medium),
    (r"\b(exactly what we need|perfect for|solves our)\b", Medium),
    (r"\b(impressive|love that|like that|that's great)\b", Medium),
    (r"\b(compared to|versus|vs|better than)\b", Medium),
    (r"\b(case study|reference|customer example)\b", Medium),
    (r"\b(tell me more|elaborate|explain)\b", Low),
    (r"\b(interesting|intriguing|curious)\b", Low),
];

const ACTION_ITEM_RULES: &[(&str, Confidence)] = &[
    (r"\b(i'll send|i will send|let me send)\b", High),
    (r"\b(let's schedule|schedule a|set up a)\b", High),
    (r"\b(by friday|by monday|by end of|by next week)\b", High),
    (r"\b(follow up|following up|reach out)\b", High),
    (r"\b(action item|to-do|task)\b", High),
    (r"\b(i'll check|let me check|look into)\b", Medium),
    (r"\b(get back to you|circle back|touch base)\b", Medium),
    (r"\b(put together|prepare|draft)\b", Medium),
    (r"\b(introduce you to|connect you with|loop in)\b", Medium),
    (r"\b(share with the team|discuss internally|talk to)\b", Low),
];

/// A case-insensitive phrase rule and the confidence a match carries
#[derive(Debug)]
pub struct PatternRule {
    pub regex: Regex,
    pub confidence: Confidence,
}

fn compile(table: &[(&str, Confidence)]) -> Vec<PatternRule> {
    table
        .iter()
        .map(|&(pattern, confidence)| PatternRule {
            regex: Regex::new(&format!("(?i){pattern}")).expect("Failed to compile pattern rule"),
            confidence,
        })
        .collect()
}

/// Compiled rule table for a pattern type, in priority order
pub fn rules(pattern_type: PatternType) -> &'static [PatternRule] {
    static PAIN_POINTS: OnceLock<Vec<PatternRule>> = OnceLock::new();
    static OBJECTIONS: OnceLock<Vec<PatternRule>> = OnceLock::new();
    static BUYING_SIGNALS: OnceLock<Vec<PatternRule>> = OnceLock::new();
    static ACTION_ITEMS: OnceLock<Vec<PatternRule>> = OnceLock::new();

    match pattern_type {
        PatternType::PainPoint => PAIN_POINTS.get_or_init(|| compile(PAIN_POINT_RULES)),
        PatternType::Objection => OBJECTIONS.get_or_init(|| compile(OBJECTION_RULES)),
        PatternType::BuyingSignal => BUYING_SIGNALS.get_or_init(|| compile(BUYING_SIGNAL_RULES)),
        PatternType::ActionItem => ACTION_ITEMS.get_or_init(|| compile(ACTION_ITEM_RULES)),
    }
}

/// Where a piece of transcript text was spoken, and by whom
#[derive(Debug, Clone, Copy)]
pub struct Utterance<'a> {
    pub text: &'a str,
    pub timestamp_seconds: f64,
    pub speaker_id: Option<&'a str>,
    pub speaker_name: Option<&'a str>,
}

/// Match one rule table against an utterance
///
/// Only the first matching rule counts, so a text contributes at most one
/// pattern per type.
pub fn detect_pattern(utterance: &Utterance<'_>, pattern_type: PatternType) -> Option<DetectedPattern> {
    let lowered = utterance.text.to_lowercase();

    rules(pattern_type).iter().find_map(|rule| {
        rule.regex.find(&lowered).map(|found| DetectedPattern {
            pattern_type,
            text: utterance.text.to_string(),
            timestamp_seconds: utterance.timestamp_seconds,
            timestamp: format_timestamp(utterance.timestamp_seconds),
            speaker_id: utterance.speaker_id.map(str::to_string),
            speaker_name: utterance.speaker_name.map(str::to_string),
            confidence: rule.confidence,
            matched_phrase: found.as_str().to_string(),
        })
    })
}
