use tracing::info;

use crate::models::{round_to, SpeakerAnalysis, SpeakerMetrics, SpeakerTurn, TranscriptSegment};

/// Result of Stage 1 turn consolidation
#[derive(Debug, Clone)]
pub struct TurnAnalysis {
    /// Consolidated speaker turns in transcript order
    pub turns: Vec<SpeakerTurn>,
    /// Per-speaker metrics, most talkative first
    pub speaker_analysis: SpeakerAnalysis,
}

/// Execute Stage 1: consolidate turns and compute speaker metrics
pub fn analyze_turns(segments: &[TranscriptSegment]) -> TurnAnalysis {
    let turns = consolidate_turns(segments);
    let metrics = compute_speaker_metrics(&turns);
    let speaker_analysis = SpeakerAnalysis::new(metrics, turns.len());

    info!(
        "Detected {} speakers, {} with names, {} turns",
        speaker_analysis.total_speakers,
        speaker_analysis.named_speaker_count(),
        speaker_analysis.total_turns
    );

    TurnAnalysis {
        turns,
        speaker_analysis,
    }
}

/// Merge consecutive segments that share a resolved speaker
pub fn consolidate_turns(segments: &[TranscriptSegment]) -> Vec<SpeakerTurn> {
    let mut turns: Vec<SpeakerTurn> = Vec::new();
    let mut parts: Vec<&str> = Vec::new();

    for segment in segments {
        let speaker = segment.speaker_or_unknown();

        let same_speaker = turns.last().is_some_and(|turn| turn.speaker_id == speaker);

        if same_speaker {
            if let Some(turn) = turns.last_mut() {
                turn.end_seconds = segment.end_seconds;
            }
        } else {
            close_turn(turns.last_mut(), &mut parts);
            turns.push(SpeakerTurn {
                speaker_id: speaker.to_string(),
                speaker_name: segment.speaker_name.clone(),
                start_seconds: segment.start_seconds,
                end_seconds: segment.end_seconds,
                text: String::new(),
                word_count: 0,
            });
        }
        parts.push(&segment.text);
    }

    close_turn(turns.last_mut(), &mut parts);
    turns
}

/// Fill in a turn's text from its accumulated segment texts
fn close_turn(turn: Option<&mut SpeakerTurn>, parts: &mut Vec<&str>) {
    if let Some(turn) = turn {
        if !parts.is_empty() {
            turn.text = parts.join(" ");
            turn.word_count = turn.text.split_whitespace().count();
        }
    }
    parts.clear();
}

/// Running totals for one speaker
struct SpeakerTotals<'a> {
    speaker_id: &'a str,
    speaker_name: Option<&'a str>,
    talk_time: f64,
    word_count: usize,
    turns: usize,
}

/// Aggregate turns into per-speaker metrics, sorted by talk time descending
pub fn compute_speaker_metrics(turns: &[SpeakerTurn]) -> Vec<SpeakerMetrics> {
    // First-seen order, so ties keep transcript order after the stable sort
    let mut totals: Vec<SpeakerTotals<'_>> = Vec::new();

    for turn in turns {
        let index = match totals.iter().position(|t| t.speaker_id == turn.speaker_id) {
            Some(index) => index,
            None => {
                totals.push(SpeakerTotals {
                    speaker_id: &turn.speaker_id,
                    speaker_name: turn.speaker_name.as_deref(),
                    talk_time: 0.0,
                    word_count: 0,
                    turns: 0,
                });
                totals.len() - 1
            }
        };
        let entry = &mut totals[index];
        entry.talk_time += turn.duration_seconds();
        entry.word_count += turn.word_count;
        entry.turns += 1;
    }

    let total_talk_time: f64 = totals.iter().map(|t| t.talk_time).sum();

    let mut metrics: Vec<SpeakerMetrics> = totals
        .into_iter()
        .map(|t| {
            let pct = if total_talk_time > 0.0 {
                t.talk_time / total_talk_time * 100.0
            } else {
                0.0
            };
            let pace = if t.talk_time > 0.0 {
                t.word_count as f64 / t.talk_time * 60.0
            } else {
                0.0
            };
            let avg_turn = if t.turns > 0 {
                t.talk_time / t.turns as f64
            } else {
                0.0
            };

            SpeakerMetrics {
                speaker_id: t.speaker_id.to_string(),
                speaker_name: t.speaker_name.map(str::to_string),
                talk_time_seconds: round_to(t.talk_time, 2),
                talk_time_pct: round_to(pct, 1),
                word_count: t.word_count,
                speaking_pace_wpm: round_to(pace, 1),
                turn_count: t.turns,
                avg_turn_length_seconds: round_to(avg_turn, 2),
            }
        })
        .collect();

    metrics.sort_by(|a, b| b.talk_time_seconds.total_cmp(&a.talk_time_seconds));
    metrics
}
