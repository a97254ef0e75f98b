use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::leaderboard::LeaderboardResponse;

use crate::error::WebError;
use crate::extract::ApiPath;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard/{season_year}",
    params(
        ("season_year" = i32, Path, description = "Season year")
    ),
    responses(
        (status = 200, description = "Season totals per user, highest first", body = LeaderboardResponse)
    ),
    tag = "leaderboard"
)]
pub async fn season_leaderboard(
    State(state): State<AppState>,
    ApiPath(season_year): ApiPath<i32>,
) -> Result<Response, WebError> {
    let leaderboard = services::season_standings(state.leaderboard.as_ref(), season_year).await?;

    Ok(Json(LeaderboardResponse { leaderboard }).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/{season_year}/{event_id}",
    params(
        ("season_year" = i32, Path, description = "Season year"),
        ("event_id" = String, Path, description = "Upstream event id")
    ),
    responses(
        (status = 200, description = "Prediction totals for one event, highest first", body = LeaderboardResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "leaderboard"
)]
pub async fn event_leaderboard(
    State(state): State<AppState>,
    ApiPath((season_year, event_id)): ApiPath<(i32, String)>,
) -> Result<Response, WebError> {
    let leaderboard = services::event_standings(
        state.events.as_ref(),
        state.leaderboard.as_ref(),
        season_year,
        &event_id,
    )
    .await?;

    Ok(Json(LeaderboardResponse { leaderboard }).into_response())
}
