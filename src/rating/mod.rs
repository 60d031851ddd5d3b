pub mod calculator;
pub mod expectation;
pub mod outcome;
pub mod strategy;
pub mod types;

pub use calculator::{calculate_match, winning_odds};
pub use outcome::{classify, MatchResult};
pub use strategy::{IndividualVsTeam, PointsBased, RatingStrategy, TeamVsTeam};
pub use types::{MatchRating, RatingChange, RosterEntry, WinningOdds};
