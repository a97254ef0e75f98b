use axum::{Router, routing::get};

use super::handlers::{get_event, list_events};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:season_year", get(list_events))
        .route("/:season_year/:event_id", get(get_event))
}
