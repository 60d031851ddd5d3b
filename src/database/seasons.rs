use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::conversion_error;
use crate::domain::{ScoreType, Season, SeasonId};
use crate::errors::query_context;

const SEASON_COLUMNS: &str = "id, name, score_type, initial_score, k_factor, closed";

pub fn insert_season(
    conn: &Connection,
    name: &str,
    score_type: ScoreType,
    initial_score: f64,
    k_factor: f64,
) -> Result<Season> {
    let sql = format!(
        "INSERT INTO seasons (name, score_type, initial_score, k_factor) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
        SEASON_COLUMNS
    );

    conn.query_row(
        &sql,
        params![name, score_type.as_str(), initial_score, k_factor],
        parse_season_row,
    )
    .context("Failed to insert season")
}

fn parse_season_row(row: &rusqlite::Row) -> rusqlite::Result<Season> {
    let score_type: String = row.get(2)?;
    Ok(Season {
        id: row.get(0)?,
        name: row.get(1)?,
        score_type: score_type.parse::<ScoreType>().map_err(|e| conversion_error(2, e))?,
        initial_score: row.get(3)?,
        k_factor: row.get(4)?,
        closed: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: SeasonId) -> Result<Option<Season>> {
    let sql = format!("SELECT {} FROM seasons WHERE id = ?1", SEASON_COLUMNS);

    conn.query_row(&sql, params![id], parse_season_row)
        .optional()
        .with_context(|| query_context("season", id))
}

pub fn list_all(conn: &Connection) -> Result<Vec<Season>> {
    let sql = format!("SELECT {} FROM seasons ORDER BY id", SEASON_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_season_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn set_closed(conn: &Connection, id: SeasonId, closed: bool) -> Result<bool> {
    let updated = conn
        .execute("UPDATE seasons SET closed = ?1 WHERE id = ?2", params![closed, id])
        .context("Failed to update season status")?;
    Ok(updated > 0)
}

pub fn update_scoring(conn: &Connection, id: SeasonId, initial_score: f64, k_factor: f64) -> Result<()> {
    conn.execute(
        "UPDATE seasons SET initial_score = ?1, k_factor = ?2 WHERE id = ?3",
        params![initial_score, k_factor, id],
    )
    .context("Failed to update season scoring")?;
    Ok(())
}
