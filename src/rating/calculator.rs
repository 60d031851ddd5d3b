use super::outcome::classify;
use super::strategy::strategy_for;
use super::types::{MatchRating, RatingChange, RosterEntry, WinningOdds};
use crate::domain::{MatchOutcome, ScoreType, Side};
use crate::errors::ScoringError;

/// Computes the new rating of every participant of one match.
///
/// Pure and deterministic: the rosters carry the ratings as of immediately
/// before the match and are not modified.
pub fn calculate_match(
    score_type: ScoreType,
    k_factor: f64,
    home_score: i32,
    away_score: i32,
    home: &[RosterEntry],
    away: &[RosterEntry],
) -> Result<MatchRating, ScoringError> {
    ensure_not_empty(home, away)?;

    let strategy = strategy_for(score_type, k_factor);
    let result = classify(home_score, away_score);
    let odds = strategy.winning_odds(home, away);

    let home_deltas = strategy.side_deltas(home, away, result.home);
    let away_deltas = strategy.side_deltas(away, home, result.away);

    let mut changes = Vec::with_capacity(home.len() + away.len());
    changes.extend(build_changes(home, &home_deltas, Side::Home, result.home));
    changes.extend(build_changes(away, &away_deltas, Side::Away, result.away));

    Ok(MatchRating { result, odds, changes })
}

/// Pre-match odds without registering anything
pub fn winning_odds(
    score_type: ScoreType,
    k_factor: f64,
    home: &[RosterEntry],
    away: &[RosterEntry],
) -> Result<WinningOdds, ScoringError> {
    ensure_not_empty(home, away)?;
    Ok(strategy_for(score_type, k_factor).winning_odds(home, away))
}

fn ensure_not_empty(home: &[RosterEntry], away: &[RosterEntry]) -> Result<(), ScoringError> {
    if home.is_empty() {
        return Err(ScoringError::EmptyRoster(Side::Home));
    }
    if away.is_empty() {
        return Err(ScoringError::EmptyRoster(Side::Away));
    }
    Ok(())
}

fn build_changes<'a>(
    roster: &'a [RosterEntry],
    deltas: &'a [f64],
    side: Side,
    outcome: MatchOutcome,
) -> impl Iterator<Item = RatingChange> + 'a {
    roster.iter().zip(deltas).map(move |(entry, delta)| RatingChange {
        entrant_id: entry.entrant_id,
        side,
        rating_before: entry.rating,
        rating_after: entry.rating + delta,
        outcome,
    })
}
