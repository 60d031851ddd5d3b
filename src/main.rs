use anyhow::Result;

use league_scoring::cli::Command;
use league_scoring::{
    handle_achievements, handle_add_player, handle_add_team, handle_close_season, handle_completions,
    handle_create_season, handle_recalculate, handle_register, handle_revert, handle_seasons, handle_serve,
    handle_set_active, handle_setup, handle_standings, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Setup => handle_setup(),
        Command::CreateSeason {
            name,
            score_type,
            initial_score,
            k_factor,
        } => handle_create_season(name, score_type.as_deref(), *initial_score, *k_factor),
        Command::CloseSeason { season_id } => handle_close_season(*season_id),
        Command::Seasons => handle_seasons(),
        Command::AddPlayer { season_id, name } => handle_add_player(*season_id, name),
        Command::AddTeam {
            season_id,
            name,
            members,
        } => handle_add_team(*season_id, name, members),
        Command::SetActive { entrant_id, active } => handle_set_active(*entrant_id, *active),
        Command::Register {
            season_id,
            home,
            away,
            home_score,
            away_score,
            played_at,
        } => handle_register(*season_id, home, away, *home_score, *away_score, *played_at),
        Command::Revert { season_id, match_id } => handle_revert(*season_id, *match_id),
        Command::Recalculate {
            season_id,
            initial_score,
            k_factor,
        } => handle_recalculate(*season_id, *initial_score, *k_factor),
        Command::Standings { season_id, season_diff } => handle_standings(*season_id, *season_diff),
        Command::Achievements { season_id, entrant_id } => handle_achievements(*season_id, *entrant_id),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
