use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::domain::{Achievement, EntrantId};
use crate::errors::{query_context, write_context};

/// Records an achievement unless the entrant already holds it.
/// Returns whether a new row was written.
pub fn upsert_achievement(
    conn: &Connection,
    entrant_id: EntrantId,
    achievement_type: &str,
    achieved_at: DateTime<Utc>,
) -> Result<bool> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO achievements (entrant_id, achievement_type, achieved_at) VALUES (?1, ?2, ?3)",
            params![entrant_id, achievement_type, achieved_at],
        )
        .with_context(|| write_context("upsert", "achievement"))?;
    Ok(inserted > 0)
}

pub fn list_for_entrant(conn: &Connection, entrant_id: EntrantId) -> Result<Vec<Achievement>> {
    let sql = "SELECT entrant_id, achievement_type, achieved_at FROM achievements WHERE entrant_id = ?1 ORDER BY achieved_at, id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![entrant_id], |row| {
            Ok(Achievement {
                entrant_id: row.get(0)?,
                achievement_type: row.get(1)?,
                achieved_at: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("achievements of entrant", entrant_id))?;

    Ok(rows)
}
