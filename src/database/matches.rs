use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::participations;
use crate::domain::{Match, MatchId, NewMatch, SeasonId, Side};
use crate::errors::{query_context, write_context};

pub fn insert_match(conn: &Connection, season_id: SeasonId, new_match: &NewMatch) -> Result<MatchId> {
    let sql = "INSERT INTO matches (season_id, played_at, home_score, away_score) VALUES (?1, ?2, ?3, ?4) RETURNING id";

    conn.query_row(
        sql,
        params![
            season_id,
            new_match.played_at,
            new_match.home_score,
            new_match.away_score
        ],
        |row| row.get(0),
    )
    .with_context(|| write_context("insert", "match"))
}

/// All matches of a season in chronological order, rosters included
pub fn list_for_season(conn: &Connection, season_id: SeasonId) -> Result<Vec<Match>> {
    let sql = "SELECT id, season_id, played_at, home_score, away_score FROM matches WHERE season_id = ?1 ORDER BY played_at, id";

    let mut stmt = conn.prepare(sql)?;
    let mut matches = stmt
        .query_map(params![season_id], |row| {
            Ok(Match {
                id: row.get(0)?,
                season_id: row.get(1)?,
                played_at: row.get(2)?,
                home_score: row.get(3)?,
                away_score: row.get(4)?,
                home: Vec::new(),
                away: Vec::new(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("matches of season", season_id))?;

    attach_rosters(conn, season_id, &mut matches)?;
    Ok(matches)
}

fn attach_rosters(conn: &Connection, season_id: SeasonId, matches: &mut [Match]) -> Result<()> {
    let index: HashMap<MatchId, usize> = matches
        .iter()
        .enumerate()
        .map(|(idx, m)| (m.id, idx))
        .collect();

    // Participations come back ordered by side position
    for participation in participations::list_for_season(conn, season_id)? {
        if let Some(&idx) = index.get(&participation.match_id) {
            let target = &mut matches[idx];
            match participation.side {
                Side::Home => target.home.push(participation.entrant_id),
                Side::Away => target.away.push(participation.entrant_id),
            }
        }
    }
    Ok(())
}

pub fn delete_match(conn: &Connection, id: MatchId) -> Result<()> {
    participations::delete_for_match(conn, id)?;
    conn.execute("DELETE FROM matches WHERE id = ?1", params![id])
        .with_context(|| write_context("delete", "match"))?;
    Ok(())
}

pub fn count_for_season(conn: &Connection, season_id: SeasonId) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM matches WHERE season_id = ?1",
        params![season_id],
        |row| row.get(0),
    )
    .with_context(|| query_context("match count of season", season_id))
}
