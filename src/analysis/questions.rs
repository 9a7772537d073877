use std::sync::OnceLock;

use regex::RegexSet;

use crate::models::QuestionType;

const CLARIFYING: &[&str] = &[
    r"(what do you mean|could you clarify|can you elaborate)",
    r"(did you say|are you saying|do you mean)",
    r"(sorry|pardon|excuse me|come again)",
];

const OPEN_DISCOVERY: &[&str] = &[
    r"^(what|how|why|tell me|describe|explain|walk me through)",
    r"^(can you tell|could you explain|would you describe)",
    r"(what does|what do you|what are|what is your)",
    r"(how does|how do you|how are)",
];

const CLOSED_CONFIRMATION: &[&str] = &[
    r"^(is it|are you|do you|does it|can you|will you|would you)",
    r"^(have you|has it|did you)",
    r"(right\?|correct\?|yes\?|no\?)",
    r"^(so you're saying|so it's|so this)",
];

fn question_sets() -> &'static [(QuestionType, RegexSet)] {
    static QUESTION_SETS: OnceLock<Vec<(QuestionType, RegexSet)>> = OnceLock::new();
    QUESTION_SETS.get_or_init(|| {
        [
            (QuestionType::Clarifying, CLARIFYING),
            (QuestionType::OpenDiscovery, OPEN_DISCOVERY),
            (QuestionType::ClosedConfirmation, CLOSED_CONFIRMATION),
        ]
        .into_iter()
        .map(|(kind, patterns)| {
            (
                kind,
                RegexSet::new(patterns).expect("Failed to compile question patterns"),
            )
        })
        .collect()
    })
}

/// Classify text containing a question mark; `None` for anything else
///
/// Categories are tried clarifying, open discovery, then closed
/// confirmation. A question matching none of them is rhetorical.
pub fn classify_question(text: &str) -> Option<QuestionType> {
    if !text.contains('?') {
        return None;
    }

    let lowered = text.trim().to_lowercase();
    let kind = question_sets()
        .iter()
        .find(|(_, set)| set.is_match(&lowered))
        .map(|(kind, _)| *kind)
        .unwrap_or(QuestionType::Rhetorical);

    Some(kind)
}
