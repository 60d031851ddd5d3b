pub mod aggregator;
pub mod form;

pub use aggregator::{compute_standings, Standings, StandingsOptions, StandingsRow};
pub use form::{form_string, point_diff, recent_form, TimeWindow, DEFAULT_FORM_LENGTH};
