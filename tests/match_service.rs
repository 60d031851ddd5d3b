use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use league_scoring::config::settings::AppConfig;
use league_scoring::database::{self, entrants, setup::reset_database, DbPool};
use league_scoring::domain::{EntrantId, NewMatch, ScoreType, SeasonId};
use league_scoring::errors::ScoringError;
use league_scoring::services::{MatchService, ScoringOverride, SeasonService, StandingsService};

struct League {
    pool: DbPool,
    seasons: SeasonService,
    matches: MatchService,
    standings: StandingsService,
}

fn league() -> League {
    let pool = database::create_memory_pool().unwrap();
    reset_database(&database::get_connection(&pool).unwrap()).unwrap();

    let config = AppConfig::new();
    League {
        seasons: SeasonService::new(pool.clone(), config.scoring.clone()),
        matches: MatchService::new(pool.clone()),
        standings: StandingsService::new(pool.clone(), config.standings.clone()),
        pool,
    }
}

fn season_with_players(league: &League, score_type: ScoreType, count: usize) -> (SeasonId, Vec<EntrantId>) {
    let season = league.seasons.create_season("Test", score_type, None, None).unwrap();
    let players = (0..count)
        .map(|i| league.seasons.add_player(season.id, &format!("Player {}", i)).unwrap().id)
        .collect();
    (season.id, players)
}

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn played(minutes: i64, home: &[EntrantId], away: &[EntrantId], home_score: i32, away_score: i32) -> NewMatch {
    NewMatch {
        played_at: at(minutes),
        home_score,
        away_score,
        home: home.to_vec(),
        away: away.to_vec(),
    }
}

fn ratings(league: &League, season_id: SeasonId) -> BTreeMap<EntrantId, f64> {
    let conn = database::get_connection(&league.pool).unwrap();
    entrants::list_for_season(&conn, season_id)
        .unwrap()
        .into_iter()
        .map(|e| (e.id, e.rating))
        .collect()
}

fn scoring_error(err: anyhow::Error) -> ScoringError {
    err.downcast::<ScoringError>().unwrap()
}

#[test]
fn test_elo_registration_persists_ratings() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 2);

    let registered = league.matches.register(season_id, played(0, &[p[0]], &[p[1]], 3, 0)).unwrap();

    assert_eq!(registered.odds.home, 0.5);
    let stored = ratings(&league, season_id);
    assert_eq!(stored[&p[0]], 1216.0);
    assert_eq!(stored[&p[1]], 1184.0);
}

#[test]
fn test_revert_is_exact_inverse() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 4);

    league.matches.register(season_id, played(0, &[p[0], p[1]], &[p[2], p[3]], 5, 2)).unwrap();
    league.matches.register(season_id, played(10, &[p[0], p[2]], &[p[1]], 1, 4)).unwrap();
    let before = ratings(&league, season_id);

    let registered = league.matches.register(season_id, played(20, &[p[3], p[1]], &[p[0]], 2, 2)).unwrap();
    assert_ne!(ratings(&league, season_id), before);

    league.matches.revert(season_id, registered.registered.id).unwrap();

    assert_eq!(ratings(&league, season_id), before);
    let standings = league.standings.standings(season_id, None).unwrap();
    let total_matches: usize = standings.rows.iter().map(|r| r.match_count).sum();
    assert_eq!(total_matches, 4 + 3);
}

#[test]
fn test_only_latest_match_can_be_reverted() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 2);

    let first = league.matches.register(season_id, played(0, &[p[0]], &[p[1]], 1, 0)).unwrap();
    let second = league.matches.register(season_id, played(5, &[p[0]], &[p[1]], 0, 1)).unwrap();
    let before = ratings(&league, season_id);

    let err = scoring_error(league.matches.revert(season_id, first.registered.id).unwrap_err());
    assert_eq!(
        err,
        ScoringError::InvalidRevertOrder {
            match_id: first.registered.id,
            latest: second.registered.id,
        }
    );
    assert_eq!(ratings(&league, season_id), before);
}

#[test]
fn test_closed_season_rejects_registration() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 2);
    league.seasons.close_season(season_id).unwrap();

    let err = scoring_error(league.matches.register(season_id, played(0, &[p[0]], &[p[1]], 1, 0)).unwrap_err());

    assert_eq!(err, ScoringError::SeasonClosed(season_id));
    assert_eq!(ratings(&league, season_id)[&p[0]], 1200.0);
}

#[test]
fn test_points_based_season() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::PointsBased, 3);

    league.matches.register(season_id, played(0, &[p[0], p[1]], &[p[2]], 2, 1)).unwrap();
    league.matches.register(season_id, played(5, &[p[0]], &[p[2]], 1, 1)).unwrap();

    let stored = ratings(&league, season_id);
    assert_eq!(stored[&p[0]], 4.0);
    assert_eq!(stored[&p[1]], 3.0);
    assert_eq!(stored[&p[2]], 1.0);
}

#[test]
fn test_achievements_are_awarded_once_and_survive_revert() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 2);

    let mut awarded = Vec::new();
    for minute in 0..5 {
        let registered = league.matches.register(season_id, played(minute, &[p[0]], &[p[1]], 1, 0)).unwrap();
        awarded.extend(registered.new_achievements);
    }
    let keys: Vec<&str> = awarded
        .iter()
        .filter(|a| a.entrant_id == p[0])
        .map(|a| a.achievement_type.as_str())
        .collect();
    assert_eq!(keys, vec!["5_win_streak", "5_clean_sheet_streak"]);

    let sixth = league.matches.register(season_id, played(5, &[p[0]], &[p[1]], 1, 0)).unwrap();
    assert!(sixth.new_achievements.is_empty());

    league.matches.revert(season_id, sixth.registered.id).unwrap();
    let after_revert = league.standings.achievements(season_id, p[0]).unwrap();
    assert_eq!(after_revert.earned.len(), 2);
}

#[test]
fn test_recalculate_matches_incremental_state() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 3);

    league.matches.register(season_id, played(0, &[p[0]], &[p[1]], 2, 1)).unwrap();
    league.matches.register(season_id, played(5, &[p[1]], &[p[2]], 0, 0)).unwrap();
    league.matches.register(season_id, played(9, &[p[2], p[1]], &[p[0]], 4, 3)).unwrap();
    let incremental = ratings(&league, season_id);

    let summary = league.matches.recalculate(season_id, ScoringOverride::default()).unwrap();

    assert_eq!(summary.matches_replayed, 3);
    assert_eq!(ratings(&league, season_id), incremental);
}

#[test]
fn test_recalculate_with_new_k_factor() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 2);
    league.matches.register(season_id, played(0, &[p[0]], &[p[1]], 1, 0)).unwrap();

    league
        .matches
        .recalculate(
            season_id,
            ScoringOverride {
                initial_score: Some(1000.0),
                k_factor: Some(16.0),
            },
        )
        .unwrap();

    let stored = ratings(&league, season_id);
    assert_eq!(stored[&p[0]], 1008.0);
    assert_eq!(stored[&p[1]], 992.0);
}

#[test]
fn test_team_members_must_belong_to_season() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 2);
    let (_, other) = season_with_players(&league, ScoreType::Elo, 1);

    let team = league.seasons.add_team(season_id, "Pair", &[p[0], p[1]]).unwrap();
    assert_eq!(team.rating, 1200.0);

    let err = scoring_error(league.seasons.add_team(season_id, "Mixed", &[p[0], other[0]]).unwrap_err());
    assert_eq!(err, ScoringError::UnknownEntrant(other[0]));
}

#[test]
fn test_inactive_entrants_leave_standings() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 3);
    league.matches.register(season_id, played(0, &[p[0]], &[p[1]], 1, 0)).unwrap();

    league.seasons.set_active(p[1], false).unwrap();
    let standings = league.standings.standings(season_id, None).unwrap();

    let ids: Vec<EntrantId> = standings.rows.iter().map(|r| r.entrant_id).collect();
    assert_eq!(ids, vec![p[0], p[2]]);
    assert_eq!(standings.on_fire.map(|r| r.entrant_id), Some(p[0]));
    assert_eq!(standings.struggling.map(|r| r.entrant_id), Some(p[0]));
}

#[test]
fn test_team_needs_distinct_members() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 2);

    let err = scoring_error(league.seasons.add_team(season_id, "Nobody", &[]).unwrap_err());
    assert_eq!(err, ScoringError::EmptyTeam);

    let err = scoring_error(league.seasons.add_team(season_id, "Twice", &[p[0], p[1], p[0]]).unwrap_err());
    assert_eq!(err, ScoringError::DuplicateTeamMember(p[0]));
}

#[test]
fn test_team_cannot_play_against_its_member() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 3);
    let team = league.seasons.add_team(season_id, "Pair", &[p[0], p[1]]).unwrap();

    let err = scoring_error(league.matches.register(season_id, played(0, &[team.id], &[p[0]], 1, 0)).unwrap_err());
    assert_eq!(err, ScoringError::OverlappingRosters(p[0]));

    league.matches.register(season_id, played(5, &[p[0], p[1]], &[p[2]], 2, 0)).unwrap();
    assert_eq!(ratings(&league, season_id)[&team.id], 1200.0);
}

#[test]
fn test_dashboard_reports_todays_swings() {
    let league = league();
    let (season_id, p) = season_with_players(&league, ScoreType::Elo, 4);

    league.matches.register(season_id, played(-24 * 60, &[p[0]], &[p[1]], 1, 0)).unwrap();
    league.matches.register(season_id, played(0, &[p[2]], &[p[3]], 3, 1)).unwrap();
    league.matches.register(season_id, played(10, &[p[0]], &[p[1]], 2, 2)).unwrap();
    league.seasons.set_active(p[3], false).unwrap();

    let dashboard = league.standings.dashboard(season_id, at(60)).unwrap();

    assert_eq!(dashboard.match_count, 3);
    let swings: Vec<EntrantId> = dashboard.todays_swings.iter().map(|s| s.entrant_id).collect();
    assert_eq!(swings, vec![p[2], p[1], p[0]]);
    assert_eq!(dashboard.todays_swings[0].point_diff, 16.0);
    assert!(dashboard.todays_swings[1].point_diff > 0.0);
    let draw_total = dashboard.todays_swings[1].point_diff + dashboard.todays_swings[2].point_diff;
    assert!(draw_total.abs() < 1e-9);
    assert_eq!(dashboard.on_fire.map(|r| r.entrant_id), Some(p[2]));
    assert_eq!(dashboard.struggling.map(|r| r.entrant_id), Some(p[1]));
}
