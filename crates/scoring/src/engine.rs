//! Scores every prediction of one event against official results.

use std::sync::Arc;

use importer::{RaceDataProvider, ResultNormalizer};
use storage::PredictionStore;
use storage::models::ActualResults;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::error::{Result, ScoringError};
use crate::points::score_prediction;

#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    pub actual: ActualResults,
    pub predictions_scored: usize,
}

#[derive(Clone)]
pub struct ScoringEngine {
    normalizer: Arc<ResultNormalizer>,
    predictions: Arc<dyn PredictionStore>,
}

impl ScoringEngine {
    pub fn new(provider: Arc<dyn RaceDataProvider>, predictions: Arc<dyn PredictionStore>) -> Self {
        Self {
            normalizer: Arc::new(ResultNormalizer::new(provider)),
            predictions,
        }
    }

    /// Fetches results, then overwrites the score of every prediction for
    /// the event. Running it twice with the same results yields the same
    /// stored scores.
    pub async fn score(
        &self,
        event_id: &str,
        season_year: i32,
        sprint_flag: bool,
    ) -> Result<ScoringOutcome> {
        let actual = Arc::new(self.normalizer.normalize(event_id).await?);
        let predictions = self
            .predictions
            .list_for_event(event_id, season_year)
            .await?;
        info!(
            "Scoring {} predictions for {}-{}",
            predictions.len(),
            event_id,
            season_year
        );

        let mut tasks = JoinSet::new();
        for prediction in predictions {
            let store = Arc::clone(&self.predictions);
            let actual = Arc::clone(&actual);
            tasks.spawn(async move {
                let score = score_prediction(&prediction.picks, &actual, sprint_flag);
                store
                    .save_score(prediction.prediction_id, &score)
                    .await
                    .map_err(|e| (prediction.prediction_id, e))
            });
        }

        let mut scored = 0;
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => scored += 1,
                Ok(Err((prediction_id, e))) => {
                    error!("Failed to save score for prediction {}: {}", prediction_id, e);
                    first_error.get_or_insert(ScoringError::from(e));
                }
                Err(e) => {
                    error!("Score task failed: {}", e);
                    first_error.get_or_insert(ScoringError::Internal(e.to_string()));
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let actual = Arc::try_unwrap(actual).unwrap_or_else(|shared| (*shared).clone());
        Ok(ScoringOutcome {
            actual,
            predictions_scored: scored,
        })
    }
}
