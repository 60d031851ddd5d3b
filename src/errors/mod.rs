use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{EntrantId, MatchId, SeasonId, Side};

/// Failures of the scoring core. Every variant is raised before any rating
/// is mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("Unknown score type: {0}")]
    InvalidScoreType(String),

    #[error("The {0} roster is empty")]
    EmptyRoster(Side),

    #[error("Entrant {0} appears more than once in the match rosters")]
    OverlappingRosters(EntrantId),

    #[error("A team needs at least one member")]
    EmptyTeam,

    #[error("Player {0} is listed more than once in the team")]
    DuplicateTeamMember(EntrantId),

    #[error("Entrant {0} is not part of this season")]
    UnknownEntrant(EntrantId),

    #[error("Season {0} not found")]
    UnknownSeason(SeasonId),

    #[error("Match {0} not found in this season")]
    UnknownMatch(MatchId),

    #[error("Cannot revert match {match_id}: match {latest} is the latest in the season")]
    InvalidRevertOrder { match_id: MatchId, latest: MatchId },

    #[error("Season {0} is closed")]
    SeasonClosed(SeasonId),

    #[error("Match played at {played_at} precedes the latest match played at {latest}")]
    OutOfOrderMatch {
        played_at: DateTime<Utc>,
        latest: DateTime<Utc>,
    },
}

impl ScoringError {
    /// Stable machine-readable code for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            ScoringError::InvalidScoreType(_) => "INVALID_SCORE_TYPE",
            ScoringError::EmptyRoster(_) => "EMPTY_ROSTER",
            ScoringError::OverlappingRosters(_) => "OVERLAPPING_ROSTERS",
            ScoringError::EmptyTeam => "EMPTY_TEAM",
            ScoringError::DuplicateTeamMember(_) => "DUPLICATE_TEAM_MEMBER",
            ScoringError::UnknownEntrant(_) => "UNKNOWN_ENTRANT",
            ScoringError::UnknownSeason(_) => "UNKNOWN_SEASON",
            ScoringError::UnknownMatch(_) => "UNKNOWN_MATCH",
            ScoringError::InvalidRevertOrder { .. } => "INVALID_REVERT_ORDER",
            ScoringError::SeasonClosed(_) => "SEASON_CLOSED",
            ScoringError::OutOfOrderMatch { .. } => "OUT_OF_ORDER_MATCH",
        }
    }
}

/// Add context to query errors
pub fn query_context(entity: &str, id: i64) -> String {
    format!("Failed to query {} {}", entity, id)
}

/// Add context to write errors
pub fn write_context(operation: &str, entity: &str) -> String {
    format!("Failed to {} {}", operation, entity)
}
