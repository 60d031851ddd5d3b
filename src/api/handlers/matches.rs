use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;

use super::{error_response, AppState};
use crate::api::models::{RegisterMatchRequest, RestoredRating, RevertResponse};
use crate::domain::{MatchId, SeasonId};

pub async fn post_match(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<SeasonId>,
    Json(request): Json<RegisterMatchRequest>,
) -> impl IntoResponse {
    let new_match = request.into_new_match(Utc::now());

    match state.matches.register(season_id, new_match) {
        Ok(registered) => (StatusCode::CREATED, Json(registered)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_match(
    State(state): State<Arc<AppState>>,
    Path((season_id, match_id)): Path<(SeasonId, MatchId)>,
) -> impl IntoResponse {
    match state.matches.revert(season_id, match_id) {
        Ok(reversal) => Json(RevertResponse {
            match_id: reversal.match_id,
            restored: reversal
                .restored
                .into_iter()
                .map(|(entrant_id, rating)| RestoredRating { entrant_id, rating })
                .collect(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
