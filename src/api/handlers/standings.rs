use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;

use super::{error_response, AppState};
use crate::api::models::{OddsRequest, StandingsParams};
use crate::domain::{EntrantId, SeasonId};
use crate::standings::TimeWindow;

pub async fn get_standings(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<SeasonId>,
    Query(params): Query<StandingsParams>,
) -> impl IntoResponse {
    let window = match params.window.as_deref() {
        Some("season") => None,
        _ => Some(TimeWindow::day_of(Utc::now())),
    };

    match state.standings.standings(season_id, window) {
        Ok(standings) => Json(standings).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<SeasonId>,
) -> impl IntoResponse {
    match state.standings.dashboard(season_id, Utc::now()) {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_entrant_form(
    State(state): State<Arc<AppState>>,
    Path((season_id, entrant_id)): Path<(SeasonId, EntrantId)>,
) -> impl IntoResponse {
    match state.standings.form(season_id, entrant_id) {
        Ok(form) => Json(form).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_entrant_achievements(
    State(state): State<Arc<AppState>>,
    Path((season_id, entrant_id)): Path<(SeasonId, EntrantId)>,
) -> impl IntoResponse {
    match state.standings.achievements(season_id, entrant_id) {
        Ok(achievements) => Json(achievements).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn post_odds(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<SeasonId>,
    Json(request): Json<OddsRequest>,
) -> impl IntoResponse {
    match state.standings.odds(season_id, &request.home, &request.away) {
        Ok(odds) => Json(odds).into_response(),
        Err(e) => error_response(e),
    }
}
