use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::dto::prediction::PicksUpdate;
use crate::error::{Result, StorageError};
use crate::models::{Prediction, Score};

const PREDICTION_COLUMNS: &str = r#"
    prediction_id, user_id, event_id, season_year, picks, locked_at,
    score, scored_at, created_at, updated_at
"#;

/// Repository for user predictions
pub struct PredictionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PredictionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Conditional upsert of picks.
    ///
    /// The insert path copies `weekend_start` into `locked_at` and only fires
    /// while the event is still open; the update path merges the supplied
    /// categories only while the stored `locked_at` is in the future. Both
    /// conditions are evaluated inside the one statement, so a write racing
    /// the lock boundary cannot slip through. Returns `None` when the lock
    /// condition rejected the write.
    pub async fn upsert_picks(
        &self,
        user_id: Uuid,
        event_id: &str,
        season_year: i32,
        picks: &PicksUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Prediction>> {
        let query = format!(
            r#"
            INSERT INTO predictions (user_id, event_id, season_year, picks, locked_at)
            SELECT $1, e.event_id, e.season_year, $4, e.weekend_start
            FROM events e
            WHERE e.event_id = $2 AND e.season_year = $3 AND e.weekend_start > $5
            ON CONFLICT (user_id, event_id, season_year)
            DO UPDATE SET
                picks = predictions.picks || EXCLUDED.picks,
                updated_at = NOW()
            WHERE predictions.locked_at > $5
            RETURNING {PREDICTION_COLUMNS}
            "#
        );

        let prediction = sqlx::query_as::<_, Prediction>(&query)
            .bind(user_id)
            .bind(event_id)
            .bind(season_year)
            .bind(Json(picks))
            .bind(now)
            .fetch_optional(self.pool)
            .await
            .map_err(StorageError::from)
            .map_err(|e| {
                if e.is_foreign_key_violation() {
                    StorageError::NotFound
                } else {
                    e
                }
            })?;

        Ok(prediction)
    }

    pub async fn find(
        &self,
        user_id: Uuid,
        event_id: &str,
        season_year: i32,
    ) -> Result<Option<Prediction>> {
        let query = format!(
            r#"
            SELECT {PREDICTION_COLUMNS}
            FROM predictions
            WHERE user_id = $1 AND event_id = $2 AND season_year = $3
            "#
        );

        let prediction = sqlx::query_as::<_, Prediction>(&query)
            .bind(user_id)
            .bind(event_id)
            .bind(season_year)
            .fetch_optional(self.pool)
            .await?;

        Ok(prediction)
    }

    pub async fn list_for_event(&self, event_id: &str, season_year: i32) -> Result<Vec<Prediction>> {
        let query = format!(
            r#"
            SELECT {PREDICTION_COLUMNS}
            FROM predictions
            WHERE event_id = $1 AND season_year = $2
            ORDER BY created_at ASC
            "#
        );

        let predictions = sqlx::query_as::<_, Prediction>(&query)
            .bind(event_id)
            .bind(season_year)
            .fetch_all(self.pool)
            .await?;

        Ok(predictions)
    }

    /// Overwrites the whole score object. Never increments.
    pub async fn save_score(&self, prediction_id: Uuid, score: &Score) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE predictions
            SET score = $2, scored_at = NOW()
            WHERE prediction_id = $1
            "#,
        )
        .bind(prediction_id)
        .bind(Json(score))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
