//! Prediction intake: the lock gate and the partial-merge write path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use storage::dto::prediction::SubmitPicksRequest;
use storage::error::StorageError;
use storage::models::{Event, Prediction};
use storage::{EventStore, PredictionStore};
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, ScoringError};

/// Predictions are accepted strictly before the weekend starts.
pub fn can_accept(event: &Event, now: DateTime<Utc>) -> bool {
    now < event.weekend_start
}

#[derive(Clone)]
pub struct PredictionService {
    events: Arc<dyn EventStore>,
    predictions: Arc<dyn PredictionStore>,
}

impl PredictionService {
    pub fn new(events: Arc<dyn EventStore>, predictions: Arc<dyn PredictionStore>) -> Self {
        Self {
            events,
            predictions,
        }
    }

    pub async fn submit_picks(
        &self,
        user_id: Uuid,
        request: &SubmitPicksRequest,
        now: DateTime<Utc>,
    ) -> Result<Prediction> {
        request
            .validate()
            .map_err(|e| ScoringError::ValidationFailed(e.to_string()))?;
        let picks = request
            .picks
            .sanitized()
            .map_err(ScoringError::ValidationFailed)?;

        let event = self
            .events
            .find_event(&request.event_id, request.season_year)
            .await
            .map_err(ScoringError::not_found("Event"))?;

        if !can_accept(&event, now) {
            warn!(
                "Rejected picks from {} for locked event {}",
                user_id,
                event.key()
            );
            return Err(ScoringError::Locked {
                event_id: event.event_id,
                locked_at: event.weekend_start,
            });
        }

        let stored = self
            .predictions
            .upsert_picks(user_id, &event.event_id, event.season_year, &picks, now)
            .await
            .map_err(|e| match e {
                StorageError::NotFound => ScoringError::NotFound("User".to_string()),
                other => ScoringError::Storage(other),
            })?;

        match stored {
            Some(prediction) => {
                debug!("Stored picks for {} on {}", user_id, event.key());
                Ok(prediction)
            }
            None => {
                // The stored lock snapshot, or the event itself, passed between read and write.
                let locked_at = self
                    .predictions
                    .find_prediction(user_id, &event.event_id, event.season_year)
                    .await?
                    .map(|p| p.locked_at)
                    .unwrap_or(event.weekend_start);
                warn!(
                    "Write for {} on {} rejected by stored lock",
                    user_id,
                    event.key()
                );
                Err(ScoringError::Locked {
                    event_id: event.event_id,
                    locked_at,
                })
            }
        }
    }

    pub async fn find_picks(
        &self,
        user_id: Uuid,
        event_id: &str,
        season_year: i32,
    ) -> Result<Option<Prediction>> {
        Ok(self
            .predictions
            .find_prediction(user_id, event_id, season_year)
            .await?)
    }
}
