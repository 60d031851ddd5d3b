use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EntrantId, NewMatch};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMatchRequest {
    /// Defaults to the time the request is handled
    pub played_at: Option<DateTime<Utc>>,
    pub home_score: i32,
    pub away_score: i32,
    pub home: Vec<EntrantId>,
    pub away: Vec<EntrantId>,
}

impl RegisterMatchRequest {
    pub fn into_new_match(self, now: DateTime<Utc>) -> NewMatch {
        NewMatch {
            played_at: self.played_at.unwrap_or(now),
            home_score: self.home_score,
            away_score: self.away_score,
            home: self.home,
            away: self.away,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OddsRequest {
    pub home: Vec<EntrantId>,
    pub away: Vec<EntrantId>,
}

#[derive(Debug, Deserialize)]
pub struct StandingsParams {
    /// `today` (default) or `season`
    pub window: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertResponse {
    pub match_id: i64,
    pub restored: Vec<RestoredRating>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredRating {
    pub entrant_id: EntrantId,
    pub rating: f64,
}
