use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use super::matches::find_season;
use crate::achievements::{detect_achievements, AchievementType};
use crate::config::settings::StandingsSettings;
use crate::database::{self, achievements, entrants, matches, participations, DbPool};
use crate::domain::{
    Achievement, Entrant, EntrantId, HistoryEntry, MatchOutcome, RatingValue, Season, SeasonId,
};
use crate::errors::ScoringError;
use crate::rating::{winning_odds, RosterEntry, WinningOdds};
use crate::standings::{
    compute_standings, point_diff, recent_form, Standings, StandingsOptions, StandingsRow,
    TimeWindow,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointSwing {
    pub entrant_id: EntrantId,
    pub name: String,
    pub point_diff: RatingValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub season: Season,
    pub match_count: i64,
    pub on_fire: Option<StandingsRow>,
    pub struggling: Option<StandingsRow>,
    /// Net rating change today, largest gain first
    pub todays_swings: Vec<PointSwing>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrantForm {
    pub entrant_id: EntrantId,
    pub name: String,
    pub form: Vec<MatchOutcome>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementView {
    pub achievement_type: String,
    pub description: Option<String>,
    pub achieved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrantAchievements {
    pub entrant_id: EntrantId,
    pub earned: Vec<AchievementView>,
    /// What the current history qualifies for; matches `earned` unless a
    /// qualifying match was later reverted
    pub qualifying: Vec<String>,
}

/// Read path for the presentation layer
#[derive(Clone)]
pub struct StandingsService {
    pool: DbPool,
    settings: StandingsSettings,
}

impl StandingsService {
    pub fn new(pool: DbPool, settings: StandingsSettings) -> Self {
        Self { pool, settings }
    }

    /// Ranked standings; `point_diff` covers `window`, or the whole season
    pub fn standings(&self, season_id: SeasonId, window: Option<TimeWindow>) -> Result<Standings> {
        let conn = database::get_connection(&self.pool)?;
        find_season(&conn, season_id)?;

        let season_entrants = entrants::list_for_season(&conn, season_id)?;
        let recorded = participations::list_for_season(&conn, season_id)?;
        let options = StandingsOptions {
            form_length: self.settings.form_length,
            point_diff_window: window,
        };

        Ok(compute_standings(&season_entrants, &recorded, &options))
    }

    pub fn dashboard(&self, season_id: SeasonId, now: DateTime<Utc>) -> Result<Dashboard> {
        let conn = database::get_connection(&self.pool)?;
        let season = find_season(&conn, season_id)?;

        let season_entrants = entrants::list_for_season(&conn, season_id)?;
        let recorded = participations::list_for_season(&conn, season_id)?;
        let today = TimeWindow::day_of(now);

        let standings = compute_standings(
            &season_entrants,
            &recorded,
            &StandingsOptions {
                form_length: self.settings.form_length,
                point_diff_window: Some(today),
            },
        );

        let mut todays_swings: Vec<PointSwing> = point_diff(&recorded, Some(&today))
            .into_iter()
            .filter_map(|(entrant_id, diff)| {
                season_entrants
                    .iter()
                    .find(|e| e.id == entrant_id && e.active)
                    .map(|e| PointSwing {
                        entrant_id,
                        name: e.name.clone(),
                        point_diff: diff,
                    })
            })
            .collect();
        todays_swings.sort_by(|a, b| {
            b.point_diff
                .total_cmp(&a.point_diff)
                .then_with(|| a.entrant_id.cmp(&b.entrant_id))
        });

        Ok(Dashboard {
            match_count: matches::count_for_season(&conn, season_id)?,
            season,
            on_fire: standings.on_fire,
            struggling: standings.struggling,
            todays_swings,
        })
    }

    pub fn form(&self, season_id: SeasonId, entrant_id: EntrantId) -> Result<EntrantForm> {
        let conn = database::get_connection(&self.pool)?;
        let entrant = find_entrant(&conn, season_id, entrant_id)?;

        let rows = participations::list_for_entrant(&conn, entrant_id)?;
        let form = recent_form(rows.iter().map(|r| &r.participation), self.settings.form_length);
        let history = rows
            .iter()
            .map(|r| HistoryEntry::from_participation(&r.participation, r.home_score, r.away_score))
            .collect();

        Ok(EntrantForm {
            entrant_id,
            name: entrant.name,
            form,
            history,
        })
    }

    pub fn achievements(&self, season_id: SeasonId, entrant_id: EntrantId) -> Result<EntrantAchievements> {
        let conn = database::get_connection(&self.pool)?;
        find_entrant(&conn, season_id, entrant_id)?;

        let earned = achievements::list_for_entrant(&conn, entrant_id)?
            .into_iter()
            .map(describe)
            .collect();

        let history: Vec<HistoryEntry> = participations::list_for_entrant(&conn, entrant_id)?
            .iter()
            .map(|r| HistoryEntry::from_participation(&r.participation, r.home_score, r.away_score))
            .collect();
        let qualifying: BTreeSet<AchievementType> = detect_achievements(&history);

        Ok(EntrantAchievements {
            entrant_id,
            earned,
            qualifying: qualifying.iter().map(AchievementType::key).collect(),
        })
    }

    /// Pre-match odds for the given rosters at current ratings
    pub fn odds(&self, season_id: SeasonId, home: &[EntrantId], away: &[EntrantId]) -> Result<WinningOdds> {
        let conn = database::get_connection(&self.pool)?;
        let season = find_season(&conn, season_id)?;
        let season_entrants = entrants::list_for_season(&conn, season_id)?;

        let home_roster = roster(&season_entrants, home)?;
        let away_roster = roster(&season_entrants, away)?;

        Ok(winning_odds(
            season.score_type,
            season.k_factor,
            &home_roster,
            &away_roster,
        )?)
    }
}

fn find_entrant(conn: &Connection, season_id: SeasonId, entrant_id: EntrantId) -> Result<Entrant> {
    find_season(conn, season_id)?;
    entrants::find_by_id(conn, entrant_id)?
        .filter(|e| e.season_id == season_id)
        .ok_or_else(|| ScoringError::UnknownEntrant(entrant_id).into())
}

fn roster(season_entrants: &[Entrant], ids: &[EntrantId]) -> Result<Vec<RosterEntry>, ScoringError> {
    ids.iter()
        .map(|&id| {
            season_entrants
                .iter()
                .find(|e| e.id == id)
                .map(|e| RosterEntry::new(id, e.rating))
                .ok_or(ScoringError::UnknownEntrant(id))
        })
        .collect()
}

fn describe(achievement: Achievement) -> AchievementView {
    AchievementView {
        description: AchievementType::from_key(&achievement.achievement_type).map(|a| a.description()),
        achievement_type: achievement.achievement_type,
        achieved_at: achievement.achieved_at,
    }
}
