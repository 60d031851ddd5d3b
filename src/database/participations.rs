use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::{parse_outcome, parse_side, ParticipationWithScore};
use crate::domain::{EntrantId, MatchId, MatchParticipation, SeasonId, Side};
use crate::errors::{query_context, write_context};

const PARTICIPATION_SELECT: &str = "
    SELECT p.match_id, p.entrant_id, p.side, m.played_at, p.rating_before, p.rating_after, p.outcome,
           m.home_score, m.away_score
    FROM match_participations p
    JOIN matches m ON m.id = p.match_id";

pub fn insert_participations(conn: &Connection, participations: &[MatchParticipation]) -> Result<()> {
    let sql = "INSERT INTO match_participations (match_id, entrant_id, side, position, rating_before, rating_after, outcome) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
    let mut stmt = conn.prepare(sql)?;

    let (mut home_position, mut away_position) = (0i64, 0i64);
    for participation in participations {
        let position = match participation.side {
            Side::Home => &mut home_position,
            Side::Away => &mut away_position,
        };

        stmt.execute(params![
            participation.match_id,
            participation.entrant_id,
            participation.side.as_str(),
            *position,
            participation.rating_before,
            participation.rating_after,
            participation.outcome.as_str(),
        ])
        .with_context(|| write_context("insert", "participation"))?;

        *position += 1;
    }

    Ok(())
}

fn parse_participation_row(row: &rusqlite::Row) -> rusqlite::Result<ParticipationWithScore> {
    let side: String = row.get(2)?;
    let outcome: String = row.get(6)?;

    Ok(ParticipationWithScore {
        participation: MatchParticipation {
            match_id: row.get(0)?,
            entrant_id: row.get(1)?,
            side: parse_side(2, &side)?,
            played_at: row.get(3)?,
            rating_before: row.get(4)?,
            rating_after: row.get(5)?,
            outcome: parse_outcome(6, &outcome)?,
        },
        home_score: row.get(7)?,
        away_score: row.get(8)?,
    })
}

pub fn list_for_season(conn: &Connection, season_id: SeasonId) -> Result<Vec<MatchParticipation>> {
    let sql = format!(
        "{} WHERE m.season_id = ?1 ORDER BY m.played_at, m.id, p.side DESC, p.position",
        PARTICIPATION_SELECT
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![season_id], parse_participation_row)?
        .map(|row| row.map(|r| r.participation))
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("participations of season", season_id))?;

    Ok(rows)
}

/// An entrant's participations with match scores, oldest first
pub fn list_for_entrant(conn: &Connection, entrant_id: EntrantId) -> Result<Vec<ParticipationWithScore>> {
    let sql = format!(
        "{} WHERE p.entrant_id = ?1 ORDER BY m.played_at, m.id",
        PARTICIPATION_SELECT
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![entrant_id], parse_participation_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("participations of entrant", entrant_id))?;

    Ok(rows)
}

pub fn delete_for_match(conn: &Connection, match_id: MatchId) -> Result<()> {
    conn.execute(
        "DELETE FROM match_participations WHERE match_id = ?1",
        params![match_id],
    )
    .with_context(|| write_context("delete", "participations"))?;
    Ok(())
}

pub fn delete_for_season(conn: &Connection, season_id: SeasonId) -> Result<()> {
    conn.execute(
        "DELETE FROM match_participations WHERE match_id IN (SELECT id FROM matches WHERE season_id = ?1)",
        params![season_id],
    )
    .with_context(|| write_context("delete", "season participations"))?;
    Ok(())
}
