use axum::{Json, Router, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::features::{admin, events, leaderboard, predictions, users};
use crate::middleware::auth::ApiKeys;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub fn router(api_keys: ApiKeys) -> Router<AppState> {
    let api = Router::new()
        .route("/health", get(health))
        .nest(
            "/users",
            users::routes::routes().merge(predictions::routes::routes()),
        )
        .nest("/events", events::routes::routes())
        .nest("/leaderboard", leaderboard::routes::routes())
        .nest("/admin", admin::routes::routes(api_keys));

    Router::new().nest("/api", api)
}
