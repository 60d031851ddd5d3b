use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::api::models::ErrorResponse;
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::errors::ScoringError;
use crate::services::{MatchService, StandingsService};

pub mod matches;
pub mod standings;

pub struct AppState {
    pub matches: MatchService,
    pub standings: StandingsService,
}

impl AppState {
    pub fn new(pool: DbPool, config: &AppConfig) -> Self {
        Self {
            matches: MatchService::new(pool.clone()),
            standings: StandingsService::new(pool, config.standings.clone()),
        }
    }
}

pub fn status_for(error: &ScoringError) -> StatusCode {
    match error {
        ScoringError::UnknownSeason(_)
        | ScoringError::UnknownEntrant(_)
        | ScoringError::UnknownMatch(_) => StatusCode::NOT_FOUND,
        ScoringError::SeasonClosed(_)
        | ScoringError::InvalidRevertOrder { .. }
        | ScoringError::OutOfOrderMatch { .. } => StatusCode::CONFLICT,
        ScoringError::InvalidScoreType(_)
        | ScoringError::EmptyRoster(_)
        | ScoringError::OverlappingRosters(_)
        | ScoringError::EmptyTeam
        | ScoringError::DuplicateTeamMember(_) => StatusCode::BAD_REQUEST,
    }
}

pub fn error_response(error: anyhow::Error) -> Response {
    match error.downcast_ref::<ScoringError>() {
        Some(scoring) => (
            status_for(scoring),
            Json(ErrorResponse {
                code: scoring.code().to_string(),
                message: scoring.to_string(),
            }),
        )
            .into_response(),
        None => {
            log::error!("Request failed: {:?}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    code: "INTERNAL_ERROR".to_string(),
                    message: error.to_string(),
                }),
            )
                .into_response()
        }
    }
}
