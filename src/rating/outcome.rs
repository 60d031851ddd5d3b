use serde::Serialize;
use std::cmp::Ordering;

use crate::domain::MatchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub home: MatchOutcome,
    pub away: MatchOutcome,
}

/// Derives each side's outcome from the final score. Scores are not validated.
pub fn classify(home_score: i32, away_score: i32) -> MatchResult {
    let (home, away) = match home_score.cmp(&away_score) {
        Ordering::Greater => (MatchOutcome::Win, MatchOutcome::Loss),
        Ordering::Less => (MatchOutcome::Loss, MatchOutcome::Win),
        Ordering::Equal => (MatchOutcome::Draw, MatchOutcome::Draw),
    };
    MatchResult { home, away }
}
