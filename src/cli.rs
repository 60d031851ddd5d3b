use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "League match scoring and standings")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Drop and recreate all tables
    Setup,
    /// Create a season
    CreateSeason {
        name: String,
        /// elo, elo-individual-vs-team or 3-1-0 (optional, defaults to elo)
        #[arg(short, long)]
        score_type: Option<String>,
        #[arg(long)]
        initial_score: Option<f64>,
        #[arg(long)]
        k_factor: Option<f64>,
    },
    /// Close a season to new matches
    CloseSeason { season_id: i64 },
    /// List all seasons
    Seasons,
    /// Add a player to a season
    AddPlayer { season_id: i64, name: String },
    /// Add a team of existing players to a season
    AddTeam {
        season_id: i64,
        name: String,
        /// Member player ids, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        members: Vec<i64>,
    },
    /// Mark an entrant active or inactive
    SetActive {
        entrant_id: i64,
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Register a match result
    Register {
        season_id: i64,
        /// Home entrant ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        home: Vec<i64>,
        /// Away entrant ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        away: Vec<i64>,
        #[arg(long)]
        home_score: i32,
        #[arg(long)]
        away_score: i32,
        /// RFC 3339 timestamp (optional, defaults to now)
        #[arg(long)]
        played_at: Option<DateTime<Utc>>,
    },
    /// Revert the latest match of a season
    Revert { season_id: i64, match_id: i64 },
    /// Replay a season from scratch, optionally with new scoring parameters
    Recalculate {
        season_id: i64,
        #[arg(long)]
        initial_score: Option<f64>,
        #[arg(long)]
        k_factor: Option<f64>,
    },
    /// Print the standings table
    Standings {
        season_id: i64,
        /// Point differential over the whole season instead of today
        #[arg(long)]
        season_diff: bool,
    },
    /// Print earned achievements of an entrant
    Achievements { season_id: i64, entrant_id: i64 },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
