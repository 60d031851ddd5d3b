use serde::Serialize;

use super::outcome::MatchResult;
use crate::domain::{EntrantId, MatchOutcome, RatingValue, Side};

/// An entrant on one side of a match, with its rating before the match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterEntry {
    pub entrant_id: EntrantId,
    pub rating: RatingValue,
}

impl RosterEntry {
    pub fn new(entrant_id: EntrantId, rating: RatingValue) -> Self {
        Self { entrant_id, rating }
    }
}

/// Pre-match win probability of each side
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinningOdds {
    pub home: f64,
    pub away: f64,
}

impl WinningOdds {
    pub fn even() -> Self {
        Self { home: 0.5, away: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    pub entrant_id: EntrantId,
    pub side: Side,
    pub rating_before: RatingValue,
    pub rating_after: RatingValue,
    pub outcome: MatchOutcome,
}

/// Everything one match does to the ratings of its participants
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRating {
    pub result: MatchResult,
    pub odds: WinningOdds,
    /// Home entrants first, in roster order, then away entrants
    pub changes: Vec<RatingChange>,
}
