pub mod achievements;
pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod rating;
pub mod report;
pub mod services;
pub mod standings;

use std::io;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::info;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::domain::{EntrantId, MatchId, NewMatch, ScoreType, SeasonId};
use crate::services::server::ServerService;
use crate::services::{MatchService, ScoringOverride, SeasonService, StandingsService};
use crate::standings::{form_string, TimeWindow};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_pool(config: &AppConfig) -> Result<DbPool> {
    let pool = database::create_pool(&config.storage.database_path)?;
    database::setup::ensure_schema(&*database::get_connection(&pool)?)?;
    Ok(pool)
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_setup() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.storage.database_path)?;
    database::setup::reset_database(&*database::get_connection(&pool)?)?;
    info!("Database ready at {}", config.storage.database_path);
    Ok(())
}

pub fn handle_create_season(
    name: &str,
    score_type: Option<&str>,
    initial_score: Option<f64>,
    k_factor: Option<f64>,
) -> Result<()> {
    let config = AppConfig::new();
    let score_type = match score_type {
        Some(code) => code.parse::<ScoreType>()?,
        None => config.scoring.default_score_type,
    };
    let service = SeasonService::new(open_pool(&config)?, config.scoring.clone());

    let season = service.create_season(name, score_type, initial_score, k_factor)?;
    println!(
        "Season {} '{}': {} (initial {}, k {})",
        season.id, season.name, season.score_type, season.initial_score, season.k_factor
    );
    Ok(())
}

pub fn handle_close_season(season_id: SeasonId) -> Result<()> {
    let config = AppConfig::new();
    SeasonService::new(open_pool(&config)?, config.scoring.clone()).close_season(season_id)
}

pub fn handle_seasons() -> Result<()> {
    let config = AppConfig::new();
    let service = SeasonService::new(open_pool(&config)?, config.scoring.clone());

    for season in service.list_seasons()? {
        println!(
            "{:>4}  {:<24} {:<24} {}",
            season.id,
            season.name,
            season.score_type,
            if season.closed { "closed" } else { "open" }
        );
    }
    Ok(())
}

pub fn handle_add_player(season_id: SeasonId, name: &str) -> Result<()> {
    let config = AppConfig::new();
    let service = SeasonService::new(open_pool(&config)?, config.scoring.clone());

    let player = service.add_player(season_id, name)?;
    println!("Player {} '{}' starts at {}", player.id, player.name, player.rating);
    Ok(())
}

pub fn handle_add_team(season_id: SeasonId, name: &str, members: &[EntrantId]) -> Result<()> {
    let config = AppConfig::new();
    let service = SeasonService::new(open_pool(&config)?, config.scoring.clone());

    let team = service.add_team(season_id, name, members)?;
    println!("Team {} '{}' starts at {}", team.id, team.name, team.rating);
    Ok(())
}

pub fn handle_set_active(entrant_id: EntrantId, active: bool) -> Result<()> {
    let config = AppConfig::new();
    SeasonService::new(open_pool(&config)?, config.scoring.clone()).set_active(entrant_id, active)
}

pub fn handle_register(
    season_id: SeasonId,
    home: &[EntrantId],
    away: &[EntrantId],
    home_score: i32,
    away_score: i32,
    played_at: Option<DateTime<Utc>>,
) -> Result<()> {
    let config = AppConfig::new();
    let service = MatchService::new(open_pool(&config)?);

    let registered = service.register(
        season_id,
        NewMatch {
            played_at: played_at.unwrap_or_else(Utc::now),
            home_score,
            away_score,
            home: home.to_vec(),
            away: away.to_vec(),
        },
    )?;

    println!(
        "Match {} registered (home {:.0}% / away {:.0}%)",
        registered.registered.id,
        registered.odds.home * 100.0,
        registered.odds.away * 100.0
    );
    for p in &registered.participations {
        println!(
            "  {:>4} {} {:.1} -> {:.1} ({:+.1})",
            p.entrant_id,
            p.outcome.as_str(),
            p.rating_before,
            p.rating_after,
            p.rating_change()
        );
    }
    for achievement in &registered.new_achievements {
        println!("  {} earned {}", achievement.entrant_id, achievement.achievement_type);
    }
    Ok(())
}

pub fn handle_revert(season_id: SeasonId, match_id: MatchId) -> Result<()> {
    let config = AppConfig::new();
    let service = MatchService::new(open_pool(&config)?);

    let reversal = service.revert(season_id, match_id)?;
    for (entrant_id, rating) in &reversal.restored {
        println!("  {:>4} back to {:.1}", entrant_id, rating);
    }
    Ok(())
}

pub fn handle_recalculate(season_id: SeasonId, initial_score: Option<f64>, k_factor: Option<f64>) -> Result<()> {
    let config = AppConfig::new();
    let service = MatchService::new(open_pool(&config)?);

    let summary = service.recalculate(
        season_id,
        ScoringOverride {
            initial_score,
            k_factor,
        },
    )?;
    println!(
        "Replayed {} matches for {} entrants",
        summary.matches_replayed, summary.entrants_updated
    );
    Ok(())
}

pub fn handle_standings(season_id: SeasonId, season_diff: bool) -> Result<()> {
    let config = AppConfig::new();
    let service = StandingsService::new(open_pool(&config)?, config.standings.clone());

    let window = if season_diff {
        None
    } else {
        Some(TimeWindow::day_of(Utc::now()))
    };
    let standings = service.standings(season_id, window)?;
    println!("{}", report::render_standings(&standings));
    Ok(())
}

pub fn handle_achievements(season_id: SeasonId, entrant_id: EntrantId) -> Result<()> {
    let config = AppConfig::new();
    let service = StandingsService::new(open_pool(&config)?, config.standings.clone());

    let form = service.form(season_id, entrant_id)?;
    let achievements = service.achievements(season_id, entrant_id)?;

    println!("{}", report::render_achievements(&form.name, &achievements));
    println!("Form: {}", form_string(&form.form));
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

