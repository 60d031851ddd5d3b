use std::collections::HashSet;

use anyhow::Result;
use log::info;

use super::matches::find_season;
use crate::config::settings::ScoringSettings;
use crate::database::{self, entrants, seasons, DbPool};
use crate::domain::{Entrant, EntrantId, EntrantKind, ScoreType, Season, SeasonId};
use crate::errors::ScoringError;

/// Season and entrant administration
#[derive(Clone)]
pub struct SeasonService {
    pool: DbPool,
    settings: ScoringSettings,
}

impl SeasonService {
    pub fn new(pool: DbPool, settings: ScoringSettings) -> Self {
        Self { pool, settings }
    }

    /// Missing scoring parameters fall back to the configured defaults
    pub fn create_season(
        &self,
        name: &str,
        score_type: ScoreType,
        initial_score: Option<f64>,
        k_factor: Option<f64>,
    ) -> Result<Season> {
        let conn = database::get_connection(&self.pool)?;
        let season = seasons::insert_season(
            &conn,
            name,
            score_type,
            initial_score.unwrap_or_else(|| self.settings.initial_score_for(score_type)),
            k_factor.unwrap_or(self.settings.default_k_factor),
        )?;

        info!("Created season {} '{}' ({})", season.id, season.name, season.score_type);
        Ok(season)
    }

    pub fn close_season(&self, season_id: SeasonId) -> Result<()> {
        let conn = database::get_connection(&self.pool)?;
        if !seasons::set_closed(&conn, season_id, true)? {
            return Err(ScoringError::UnknownSeason(season_id).into());
        }
        info!("Closed season {}", season_id);
        Ok(())
    }

    pub fn add_player(&self, season_id: SeasonId, name: &str) -> Result<Entrant> {
        let conn = database::get_connection(&self.pool)?;
        let season = find_season(&conn, season_id)?;

        let player = entrants::insert_player(&conn, season_id, name, season.initial_score)?;
        info!("Added player {} '{}' to season {}", player.id, player.name, season_id);
        Ok(player)
    }

    /// Team members must be players of the same season
    pub fn add_team(&self, season_id: SeasonId, name: &str, members: &[EntrantId]) -> Result<Entrant> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        let season = find_season(&tx, season_id)?;

        if members.is_empty() {
            return Err(ScoringError::EmptyTeam.into());
        }
        let mut seen = HashSet::with_capacity(members.len());
        for &member_id in members {
            if !seen.insert(member_id) {
                return Err(ScoringError::DuplicateTeamMember(member_id).into());
            }

            let is_player = entrants::find_by_id(&tx, member_id)?
                .is_some_and(|e| e.season_id == season_id && e.kind == EntrantKind::Player);
            if !is_player {
                return Err(ScoringError::UnknownEntrant(member_id).into());
            }
        }

        let team = entrants::insert_team(&tx, season_id, name, season.initial_score, members)?;
        tx.commit()?;

        info!(
            "Added team {} '{}' with {} members to season {}",
            team.id,
            team.name,
            members.len(),
            season_id
        );
        Ok(team)
    }

    /// Inactive entrants keep their ratings but drop out of the standings
    pub fn set_active(&self, entrant_id: EntrantId, active: bool) -> Result<()> {
        let conn = database::get_connection(&self.pool)?;
        if !entrants::set_active(&conn, entrant_id, active)? {
            return Err(ScoringError::UnknownEntrant(entrant_id).into());
        }
        info!("Entrant {} is now {}", entrant_id, if active { "active" } else { "inactive" });
        Ok(())
    }

    pub fn list_seasons(&self) -> Result<Vec<Season>> {
        let conn = database::get_connection(&self.pool)?;
        seasons::list_all(&conn)
    }
}
