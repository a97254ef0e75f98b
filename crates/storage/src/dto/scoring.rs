use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::ActualResults;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ManualScoreRequest {
    #[validate(length(min = 1, max = 64))]
    pub event_id: String,
    #[validate(range(min = 1950, max = 2100))]
    pub season_year: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ManualScoreResponse {
    pub event_name: String,
    pub actual: ActualResults,
    pub predictions_scored: usize,
}
