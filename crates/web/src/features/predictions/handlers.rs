use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{
    dto::prediction::{PredictionResponse, SeasonQuery, SubmitPicksRequest},
    models::Prediction,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    put,
    path = "/api/users/{user_id}/predictions",
    params(
        ("user_id" = Uuid, Path, description = "User id")
    ),
    request_body = SubmitPicksRequest,
    responses(
        (status = 200, description = "Picks merged; full stored prediction", body = Prediction),
        (status = 400, description = "Malformed picks payload"),
        (status = 403, description = "Event weekend already started"),
        (status = 404, description = "Unknown event or user")
    ),
    tag = "predictions"
)]
pub async fn submit_picks(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<SubmitPicksRequest>,
) -> Result<Response, WebError> {
    let prediction = services::submit_picks(&state.predictions, user_id, &req).await?;

    Ok(Json(prediction).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/predictions/{event_id}",
    params(
        ("user_id" = Uuid, Path, description = "User id"),
        ("event_id" = String, Path, description = "Upstream event id"),
        SeasonQuery
    ),
    responses(
        (status = 200, description = "Stored prediction, or null when none was submitted", body = PredictionResponse)
    ),
    tag = "predictions"
)]
pub async fn get_picks(
    State(state): State<AppState>,
    ApiPath((user_id, event_id)): ApiPath<(Uuid, String)>,
    ApiQuery(query): ApiQuery<SeasonQuery>,
) -> Result<Response, WebError> {
    let prediction =
        services::get_picks(&state.predictions, user_id, &event_id, query.season_year).await?;

    Ok(Json(PredictionResponse { prediction }).into_response())
}
