use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    matches::{delete_match, post_match},
    standings::{get_dashboard, get_entrant_achievements, get_entrant_form, get_standings, post_odds},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/seasons/:season_id/standings", get(get_standings))
        .route("/api/seasons/:season_id/dashboard", get(get_dashboard))
        .route("/api/seasons/:season_id/entrants/:entrant_id/form", get(get_entrant_form))
        .route(
            "/api/seasons/:season_id/entrants/:entrant_id/achievements",
            get(get_entrant_achievements),
        )
        .route("/api/seasons/:season_id/odds", post(post_odds))
        .route("/api/seasons/:season_id/matches", post(post_match))
        .route("/api/seasons/:season_id/matches/:match_id", delete(delete_match))
        .with_state(state)
}
