use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{get_user, register_user};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route("/:user_id", get(get_user))
}
