use axum::{Router, middleware, routing::post};

use super::handlers::{score_event, sync_calendar};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/calendar/:season_year/sync", post(sync_calendar))
        .route("/score", post(score_event))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
