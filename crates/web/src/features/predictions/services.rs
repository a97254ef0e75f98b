use chrono::Utc;
use scoring::{PredictionService, Result};
use storage::{dto::prediction::SubmitPicksRequest, models::Prediction};
use uuid::Uuid;

/// Merge submitted picks into the user's prediction, evaluated against the current time
pub async fn submit_picks(
    predictions: &PredictionService,
    user_id: Uuid,
    request: &SubmitPicksRequest,
) -> Result<Prediction> {
    predictions.submit_picks(user_id, request, Utc::now()).await
}

pub async fn get_picks(
    predictions: &PredictionService,
    user_id: Uuid,
    event_id: &str,
    season_year: i32,
) -> Result<Option<Prediction>> {
    predictions.find_picks(user_id, event_id, season_year).await
}
