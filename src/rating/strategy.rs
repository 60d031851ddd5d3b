use super::expectation::{expected_score, side_rating};
use super::types::{RosterEntry, WinningOdds};
use crate::domain::{MatchOutcome, ScoreType};

/// Scheme-specific rating math. Implementations are stateless apart from
/// their configuration, so the same inputs always yield the same deltas.
pub trait RatingStrategy {
    /// Pre-match win probability of each side
    fn winning_odds(&self, home: &[RosterEntry], away: &[RosterEntry]) -> WinningOdds;

    /// Rating delta of every member of `own`, in roster order
    fn side_deltas(
        &self,
        own: &[RosterEntry],
        opponents: &[RosterEntry],
        outcome: MatchOutcome,
    ) -> Vec<f64>;
}

pub fn strategy_for(score_type: ScoreType, k_factor: f64) -> Box<dyn RatingStrategy> {
    match score_type {
        ScoreType::Elo => Box::new(TeamVsTeam::new(k_factor)),
        ScoreType::EloIndividualVsTeam => Box::new(IndividualVsTeam::new(k_factor)),
        ScoreType::PointsBased => Box::new(PointsBased),
    }
}

fn side_mean_odds(home: &[RosterEntry], away: &[RosterEntry]) -> WinningOdds {
    let home_rating = side_rating(home);
    let away_rating = side_rating(away);
    WinningOdds {
        home: expected_score(home_rating, away_rating),
        away: expected_score(away_rating, home_rating),
    }
}

/// `elo`: both sides collapse to their mean rating, every member of a side
/// moves by the same amount
#[derive(Debug, Clone, Copy)]
pub struct TeamVsTeam {
    k_factor: f64,
}

impl TeamVsTeam {
    pub fn new(k_factor: f64) -> Self {
        Self { k_factor }
    }
}

impl RatingStrategy for TeamVsTeam {
    fn winning_odds(&self, home: &[RosterEntry], away: &[RosterEntry]) -> WinningOdds {
        side_mean_odds(home, away)
    }

    fn side_deltas(
        &self,
        own: &[RosterEntry],
        opponents: &[RosterEntry],
        outcome: MatchOutcome,
    ) -> Vec<f64> {
        let expected = expected_score(side_rating(own), side_rating(opponents));
        let delta = self.k_factor * (outcome.actual_score() - expected);
        vec![delta; own.len()]
    }
}

/// `elo-individual-vs-team`: each player's own rating is measured against
/// the opposing side's mean
#[derive(Debug, Clone, Copy)]
pub struct IndividualVsTeam {
    k_factor: f64,
}

impl IndividualVsTeam {
    pub fn new(k_factor: f64) -> Self {
        Self { k_factor }
    }
}

impl RatingStrategy for IndividualVsTeam {
    fn winning_odds(&self, home: &[RosterEntry], away: &[RosterEntry]) -> WinningOdds {
        side_mean_odds(home, away)
    }

    fn side_deltas(
        &self,
        own: &[RosterEntry],
        opponents: &[RosterEntry],
        outcome: MatchOutcome,
    ) -> Vec<f64> {
        let opponent_rating = side_rating(opponents);
        own.iter()
            .map(|player| {
                let expected = expected_score(player.rating, opponent_rating);
                self.k_factor * (outcome.actual_score() - expected)
            })
            .collect()
    }
}

/// `3-1-0`: ratings are cumulative league points
#[derive(Debug, Clone, Copy)]
pub struct PointsBased;

const POINTS_FOR_WIN: f64 = 3.0;
const POINTS_FOR_DRAW: f64 = 1.0;
const POINTS_FOR_LOSS: f64 = 0.0;

impl RatingStrategy for PointsBased {
    fn winning_odds(&self, _home: &[RosterEntry], _away: &[RosterEntry]) -> WinningOdds {
        WinningOdds::even()
    }

    fn side_deltas(
        &self,
        own: &[RosterEntry],
        _opponents: &[RosterEntry],
        outcome: MatchOutcome,
    ) -> Vec<f64> {
        let points = match outcome {
            MatchOutcome::Win => POINTS_FOR_WIN,
            MatchOutcome::Draw => POINTS_FOR_DRAW,
            MatchOutcome::Loss => POINTS_FOR_LOSS,
        };
        vec![points; own.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(ratings: &[f64]) -> Vec<RosterEntry> {
        ratings
            .iter()
            .enumerate()
            .map(|(idx, &rating)| RosterEntry::new(idx as i64 + 1, rating))
            .collect()
    }

    #[test]
    fn test_team_vs_team_gives_uniform_deltas() {
        let strategy = TeamVsTeam::new(32.0);
        let deltas = strategy.side_deltas(
            &roster(&[1100.0, 1300.0]),
            &roster(&[1200.0]),
            MatchOutcome::Win,
        );
        assert_eq!(deltas, vec![16.0, 16.0]);
    }

    #[test]
    fn test_individual_vs_team_weights_each_player() {
        let strategy = IndividualVsTeam::new(32.0);
        let deltas = strategy.side_deltas(
            &roster(&[1100.0, 1300.0]),
            &roster(&[1200.0]),
            MatchOutcome::Win,
        );
        // The weaker player was less expected to win and gains more
        assert!(deltas[0] > 16.0);
        assert!(deltas[1] < 16.0);
        assert!((deltas[0] + deltas[1] - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_strategies_agree_one_versus_one() {
        let home = roster(&[1250.0]);
        let away = [RosterEntry::new(9, 1175.0)];
        let team = TeamVsTeam::new(24.0).side_deltas(&home, &away, MatchOutcome::Draw);
        let individual = IndividualVsTeam::new(24.0).side_deltas(&home, &away, MatchOutcome::Draw);
        assert_eq!(team, individual);
    }

    #[test]
    fn test_points_based_ignores_ratings() {
        let strategy = PointsBased;
        let home = roster(&[10.0, 2.0]);
        let away = roster(&[40.0]);
        assert_eq!(strategy.side_deltas(&home, &away, MatchOutcome::Win), vec![3.0, 3.0]);
        assert_eq!(strategy.side_deltas(&away, &home, MatchOutcome::Loss), vec![0.0]);
        assert_eq!(strategy.side_deltas(&away, &home, MatchOutcome::Draw), vec![1.0]);
        assert_eq!(strategy.winning_odds(&home, &away), WinningOdds::even());
    }
}
