use rusqlite::types::Type;

use crate::domain::{EntrantId, MatchOutcome, MatchParticipation, Side};

/// Participation joined with its match, enough to rebuild an entrant's history
#[derive(Debug, Clone)]
pub struct ParticipationWithScore {
    pub participation: MatchParticipation,
    pub home_score: i32,
    pub away_score: i32,
}

/// Row of the team roster table
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMember {
    pub team_id: EntrantId,
    pub member_id: EntrantId,
    pub position: i64,
}

pub(crate) fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

pub(crate) fn invalid_code(column: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        format!("Unexpected value: {}", value).into(),
    )
}

pub(crate) fn parse_side(column: usize, value: &str) -> rusqlite::Result<Side> {
    Side::from_code(value).ok_or_else(|| invalid_code(column, value))
}

pub(crate) fn parse_outcome(column: usize, value: &str) -> rusqlite::Result<MatchOutcome> {
    MatchOutcome::from_code(value).ok_or_else(|| invalid_code(column, value))
}
