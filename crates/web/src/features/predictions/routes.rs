use axum::{
    Router,
    routing::{get, put},
};

use super::handlers::{get_picks, submit_picks};
use crate::state::AppState;

/// Mounted next to the user routes under `/api/users`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:user_id/predictions", put(submit_picks))
        .route("/:user_id/predictions/:event_id", get(get_picks))
}
