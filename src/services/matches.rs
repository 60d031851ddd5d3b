use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::Connection;
use serde::Serialize;

use super::locks::{acquire, SeasonLocks};
use crate::achievements::detect_achievements;
use crate::database::{self, achievements, entrants, matches, participations, seasons, DbPool};
use crate::domain::{
    Achievement, EntrantId, HistoryEntry, Match, MatchId, MatchParticipation, NewMatch, Season,
    SeasonId,
};
use crate::errors::ScoringError;
use crate::ledger::{MatchReversal, SeasonLedger};
use crate::rating::{MatchRating, WinningOdds};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredMatch {
    #[serde(rename = "match")]
    pub registered: Match,
    pub odds: WinningOdds,
    pub participations: Vec<MatchParticipation>,
    pub new_achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationSummary {
    pub season_id: SeasonId,
    pub matches_replayed: usize,
    pub entrants_updated: usize,
}

/// Scoring overrides applied before a season is replayed
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringOverride {
    pub initial_score: Option<f64>,
    pub k_factor: Option<f64>,
}

/// Serialized write path: every mutation of a season holds that season's
/// lock and runs inside one transaction
#[derive(Clone)]
pub struct MatchService {
    pool: DbPool,
    locks: SeasonLocks,
}

impl MatchService {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            locks: SeasonLocks::new(),
        }
    }

    pub fn register(&self, season_id: SeasonId, new_match: NewMatch) -> Result<RegisteredMatch> {
        let handle = self.locks.handle(season_id);
        let _guard = acquire(&handle);

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let ledger = load_ledger(&tx, season_id)?;
        let application = ledger.prepare_registration(&new_match)?;

        let match_id = matches::insert_match(&tx, season_id, &application.new_match)?;
        let recorded = application.participations(match_id);
        participations::insert_participations(&tx, &recorded)?;
        apply_ratings(&tx, &application.rating)?;

        let participants: Vec<EntrantId> = recorded.iter().map(|p| p.entrant_id).collect();
        let new_achievements = award_achievements(&tx, &participants, new_match.played_at)?;

        tx.commit()?;

        info!(
            "Registered match {} in season {} ({}-{}), {} new achievements",
            match_id,
            season_id,
            new_match.home_score,
            new_match.away_score,
            new_achievements.len()
        );

        Ok(RegisteredMatch {
            registered: Match {
                id: match_id,
                season_id,
                played_at: new_match.played_at,
                home_score: new_match.home_score,
                away_score: new_match.away_score,
                home: new_match.home,
                away: new_match.away,
            },
            odds: application.rating.odds,
            participations: recorded,
            new_achievements,
        })
    }

    /// Reverts the season's latest match, restoring pre-match ratings
    pub fn revert(&self, season_id: SeasonId, match_id: MatchId) -> Result<MatchReversal> {
        let handle = self.locks.handle(season_id);
        let _guard = acquire(&handle);

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let ledger = load_ledger(&tx, season_id)?;
        let reversal = ledger.prepare_reversal(match_id)?;

        for &(entrant_id, rating) in &reversal.restored {
            entrants::update_rating(&tx, entrant_id, rating)?;
        }
        matches::delete_match(&tx, match_id)?;

        tx.commit()?;

        info!(
            "Reverted match {} in season {}, restored {} ratings",
            match_id,
            season_id,
            reversal.restored.len()
        );
        Ok(reversal)
    }

    /// Replays the whole season from its initial score and rewrites every
    /// participation and current rating
    pub fn recalculate(&self, season_id: SeasonId, overrides: ScoringOverride) -> Result<RecalculationSummary> {
        let handle = self.locks.handle(season_id);
        let _guard = acquire(&handle);

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let mut season = find_season(&tx, season_id)?;
        if overrides.initial_score.is_some() || overrides.k_factor.is_some() {
            season.initial_score = overrides.initial_score.unwrap_or(season.initial_score);
            season.k_factor = overrides.k_factor.unwrap_or(season.k_factor);
            seasons::update_scoring(&tx, season_id, season.initial_score, season.k_factor)?;
            debug!(
                "Season {} scoring set to initial {} / k {}",
                season_id, season.initial_score, season.k_factor
            );
        }

        let season_entrants = entrants::list_for_season(&tx, season_id)?;
        let history = matches::list_for_season(&tx, season_id)?;
        let ledger = SeasonLedger::replay(season, &season_entrants, history)?;

        participations::delete_for_season(&tx, season_id)?;
        for chunk in ledger.participations().chunk_by(|a, b| a.match_id == b.match_id) {
            participations::insert_participations(&tx, chunk)?;
        }
        for (&entrant_id, &rating) in ledger.ratings() {
            entrants::update_rating(&tx, entrant_id, rating)?;
        }

        tx.commit()?;

        let summary = RecalculationSummary {
            season_id,
            matches_replayed: ledger.matches().len(),
            entrants_updated: ledger.ratings().len(),
        };
        info!(
            "Recalculated season {}: {} matches, {} entrants",
            season_id, summary.matches_replayed, summary.entrants_updated
        );
        Ok(summary)
    }
}

pub(crate) fn find_season(conn: &Connection, season_id: SeasonId) -> Result<Season> {
    seasons::find_by_id(conn, season_id)?
        .ok_or_else(|| ScoringError::UnknownSeason(season_id).into())
}

fn load_ledger(conn: &Connection, season_id: SeasonId) -> Result<SeasonLedger> {
    let season = find_season(conn, season_id)?;
    let season_entrants = entrants::list_for_season(conn, season_id)?;
    let history = matches::list_for_season(conn, season_id)?;
    let recorded = participations::list_for_season(conn, season_id)?;

    Ok(SeasonLedger::with_history(season, &season_entrants, history, recorded))
}

fn apply_ratings(conn: &Connection, rating: &MatchRating) -> Result<()> {
    for change in &rating.changes {
        entrants::update_rating(conn, change.entrant_id, change.rating_after)?;
    }
    Ok(())
}

fn award_achievements(
    conn: &Connection,
    participants: &[EntrantId],
    achieved_at: DateTime<Utc>,
) -> Result<Vec<Achievement>> {
    let mut awarded = Vec::new();

    for &entrant_id in participants {
        let history: Vec<HistoryEntry> = participations::list_for_entrant(conn, entrant_id)?
            .iter()
            .map(|row| HistoryEntry::from_participation(&row.participation, row.home_score, row.away_score))
            .collect();

        for achievement in detect_achievements(&history) {
            let key = achievement.key();
            if achievements::upsert_achievement(conn, entrant_id, &key, achieved_at)? {
                debug!("Entrant {} earned {}", entrant_id, key);
                awarded.push(Achievement {
                    entrant_id,
                    achievement_type: key,
                    achieved_at,
                });
            }
        }
    }

    Ok(awarded)
}
