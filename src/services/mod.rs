pub mod locks;
pub mod matches;
pub mod seasons;
pub mod server;
pub mod standings;

pub use locks::SeasonLocks;
pub use matches::{MatchService, RecalculationSummary, RegisteredMatch, ScoringOverride};
pub use seasons::SeasonService;
pub use standings::{Dashboard, EntrantAchievements, EntrantForm, StandingsService};
