use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::models::{EntrantId, Match, MatchId, MatchOutcome, MatchParticipation, Side};

/// One match from a single entrant's perspective
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub match_id: MatchId,
    pub played_at: DateTime<Utc>,
    pub outcome: MatchOutcome,
    pub goals_scored: i32,
    pub goals_conceded: i32,
}

impl HistoryEntry {
    pub fn from_participation(
        participation: &MatchParticipation,
        home_score: i32,
        away_score: i32,
    ) -> Self {
        let (goals_scored, goals_conceded) = match participation.side {
            Side::Home => (home_score, away_score),
            Side::Away => (away_score, home_score),
        };

        Self {
            match_id: participation.match_id,
            played_at: participation.played_at,
            outcome: participation.outcome,
            goals_scored,
            goals_conceded,
        }
    }
}

/// Builds an entrant's chronological history, oldest match first
pub fn build_history(
    entrant_id: EntrantId,
    matches: &[Match],
    participations: &[MatchParticipation],
) -> Vec<HistoryEntry> {
    let scores: HashMap<MatchId, (i32, i32)> = matches
        .iter()
        .map(|m| (m.id, (m.home_score, m.away_score)))
        .collect();

    let mut own: Vec<&MatchParticipation> = participations
        .iter()
        .filter(|p| p.entrant_id == entrant_id)
        .collect();
    own.sort_by_key(|p| p.order_key());

    own.into_iter()
        .filter_map(|p| {
            scores
                .get(&p.match_id)
                .map(|&(home, away)| HistoryEntry::from_participation(p, home, away))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn participation(match_id: MatchId, side: Side, outcome: MatchOutcome, hour: u32) -> MatchParticipation {
        MatchParticipation {
            match_id,
            entrant_id: 1,
            side,
            played_at: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
            rating_before: 0.0,
            rating_after: 0.0,
            outcome,
        }
    }

    fn game(id: MatchId, home_score: i32, away_score: i32, hour: u32) -> Match {
        Match {
            id,
            season_id: 1,
            played_at: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
            home_score,
            away_score,
            home: vec![1],
            away: vec![2],
        }
    }

    #[test]
    fn test_history_is_chronological_and_side_aware() {
        let matches = vec![game(2, 0, 4, 12), game(1, 2, 1, 10)];
        let participations = vec![
            participation(2, Side::Away, MatchOutcome::Win, 12),
            participation(1, Side::Home, MatchOutcome::Win, 10),
        ];

        let history = build_history(1, &matches, &participations);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].match_id, 1);
        assert_eq!((history[0].goals_scored, history[0].goals_conceded), (2, 1));
        assert_eq!((history[1].goals_scored, history[1].goals_conceded), (4, 0));
    }
}
