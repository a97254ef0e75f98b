use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{dto::user::CreateUserRequest, models::User};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Existing or newly created user", body = User),
        (status = 400, description = "Validation error")
    ),
    tag = "users"
)]
pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::find_or_create(state.users.as_ref(), &req).await?;

    Ok(Json(user).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let user = services::get_user(state.users.as_ref(), user_id).await?;

    Ok(Json(user).into_response())
}
