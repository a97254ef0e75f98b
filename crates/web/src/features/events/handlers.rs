use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{dto::event::EventSummary, models::Event};

use crate::error::WebError;
use crate::extract::ApiPath;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events/{season_year}",
    params(
        ("season_year" = i32, Path, description = "Season year")
    ),
    responses(
        (status = 200, description = "Season calendar", body = Vec<EventSummary>)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    ApiPath(season_year): ApiPath<i32>,
) -> Result<Response, WebError> {
    let events = services::list_events(state.events.as_ref(), season_year).await?;

    Ok(Json(events).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{season_year}/{event_id}",
    params(
        ("season_year" = i32, Path, description = "Season year"),
        ("event_id" = String, Path, description = "Upstream event id")
    ),
    responses(
        (status = 200, description = "Event with its full session schedule", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    ApiPath((season_year, event_id)): ApiPath<(i32, String)>,
) -> Result<Response, WebError> {
    let event = services::get_event(state.events.as_ref(), season_year, &event_id).await?;

    Ok(Json(event).into_response())
}
