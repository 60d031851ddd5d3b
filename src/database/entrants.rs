use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{invalid_code, TeamMember};
use crate::domain::{Entrant, EntrantId, EntrantKind, RatingValue, SeasonId};
use crate::errors::{query_context, write_context};

const ENTRANT_COLUMNS: &str = "id, season_id, name, kind, rating, active";

/// Raw entrant row; team members are attached afterwards
struct EntrantRow {
    entrant: Entrant,
    is_team: bool,
}

pub fn insert_player(conn: &Connection, season_id: SeasonId, name: &str, rating: RatingValue) -> Result<Entrant> {
    insert_entrant(conn, season_id, name, "player", rating)
        .map(|row| row.entrant)
}

pub fn insert_team(
    conn: &Connection,
    season_id: SeasonId,
    name: &str,
    rating: RatingValue,
    members: &[EntrantId],
) -> Result<Entrant> {
    let mut team = insert_entrant(conn, season_id, name, "team", rating)?.entrant;

    for (position, &member_id) in members.iter().enumerate() {
        conn.execute(
            "INSERT INTO team_members (team_id, member_id, position) VALUES (?1, ?2, ?3)",
            params![team.id, member_id, position as i64],
        )
        .with_context(|| write_context("insert", "team member"))?;
    }

    team.kind = EntrantKind::Team {
        members: members.to_vec(),
    };
    Ok(team)
}

fn insert_entrant(
    conn: &Connection,
    season_id: SeasonId,
    name: &str,
    kind: &str,
    rating: RatingValue,
) -> Result<EntrantRow> {
    let sql = format!(
        "INSERT INTO entrants (season_id, name, kind, rating) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
        ENTRANT_COLUMNS
    );

    conn.query_row(&sql, params![season_id, name, kind, rating], parse_entrant_row)
        .with_context(|| write_context("insert", "entrant"))
}

fn parse_entrant_row(row: &rusqlite::Row) -> rusqlite::Result<EntrantRow> {
    let kind: String = row.get(3)?;
    let is_team = match kind.as_str() {
        "player" => false,
        "team" => true,
        other => return Err(invalid_code(3, other)),
    };

    Ok(EntrantRow {
        entrant: Entrant {
            id: row.get(0)?,
            season_id: row.get(1)?,
            name: row.get(2)?,
            kind: EntrantKind::Player,
            rating: row.get(4)?,
            active: row.get(5)?,
        },
        is_team,
    })
}

pub fn find_by_id(conn: &Connection, id: EntrantId) -> Result<Option<Entrant>> {
    let sql = format!("SELECT {} FROM entrants WHERE id = ?1", ENTRANT_COLUMNS);

    let row = conn
        .query_row(&sql, params![id], parse_entrant_row)
        .optional()
        .with_context(|| query_context("entrant", id))?;

    match row {
        Some(row) => {
            let members = list_team_members(conn, row.entrant.season_id)?;
            Ok(Some(attach_members(row, &members)))
        }
        None => Ok(None),
    }
}

pub fn list_for_season(conn: &Connection, season_id: SeasonId) -> Result<Vec<Entrant>> {
    let sql = format!(
        "SELECT {} FROM entrants WHERE season_id = ?1 ORDER BY id",
        ENTRANT_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![season_id], parse_entrant_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("entrants of season", season_id))?;

    let members = list_team_members(conn, season_id)?;
    Ok(rows.into_iter().map(|row| attach_members(row, &members)).collect())
}

fn list_team_members(conn: &Connection, season_id: SeasonId) -> Result<HashMap<EntrantId, Vec<EntrantId>>> {
    let sql = "
        SELECT tm.team_id, tm.member_id, tm.position
        FROM team_members tm
        JOIN entrants e ON e.id = tm.team_id
        WHERE e.season_id = ?1
        ORDER BY tm.team_id, tm.position
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], |row| {
            Ok(TeamMember {
                team_id: row.get(0)?,
                member_id: row.get(1)?,
                position: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut teams: HashMap<EntrantId, Vec<EntrantId>> = HashMap::new();
    for member in rows {
        teams.entry(member.team_id).or_default().push(member.member_id);
    }
    Ok(teams)
}

fn attach_members(row: EntrantRow, teams: &HashMap<EntrantId, Vec<EntrantId>>) -> Entrant {
    let mut entrant = row.entrant;
    if row.is_team {
        entrant.kind = EntrantKind::Team {
            members: teams.get(&entrant.id).cloned().unwrap_or_default(),
        };
    }
    entrant
}

pub fn update_rating(conn: &Connection, id: EntrantId, rating: RatingValue) -> Result<()> {
    conn.execute("UPDATE entrants SET rating = ?1 WHERE id = ?2", params![rating, id])
        .with_context(|| write_context("update rating of", "entrant"))?;
    Ok(())
}

pub fn set_active(conn: &Connection, id: EntrantId, active: bool) -> Result<bool> {
    let updated = conn
        .execute("UPDATE entrants SET active = ?1 WHERE id = ?2", params![active, id])
        .with_context(|| write_context("update status of", "entrant"))?;
    Ok(updated > 0)
}
