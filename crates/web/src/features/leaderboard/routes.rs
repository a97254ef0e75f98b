use axum::{Router, routing::get};

use super::handlers::{event_leaderboard, season_leaderboard};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:season_year", get(season_leaderboard))
        .route("/:season_year/:event_id", get(event_leaderboard))
}
