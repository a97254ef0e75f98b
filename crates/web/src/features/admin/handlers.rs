use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::{
    event::CalendarSyncResponse,
    scoring::{ManualScoreRequest, ManualScoreResponse},
};
use validator::Validate;

use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/admin/calendar/{season_year}/sync",
    params(
        ("season_year" = i32, Path, description = "Season year to sync")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Calendar synced", body = CalendarSyncResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Upstream rate limit exhausted")
    ),
    tag = "admin"
)]
pub async fn sync_calendar(
    State(state): State<AppState>,
    ApiPath(season_year): ApiPath<i32>,
) -> Result<Response, WebError> {
    let report = services::sync_calendar(&state.calendar, season_year).await?;

    Ok(Json(report).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/score",
    request_body = ManualScoreRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event scored", body = ManualScoreResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found"),
        (status = 503, description = "Results not yet available")
    ),
    tag = "admin"
)]
pub async fn score_event(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ManualScoreRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::score_event(&state.scheduler, &req).await?;

    Ok(Json(response).into_response())
}
