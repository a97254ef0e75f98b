use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use crate::error::{Result, StorageError};
use crate::models::{Event, EventSchedule};

const EVENT_COLUMNS: &str = r#"
    event_id, season_year, name, sprint_flag, weekend_start, weekend_end,
    sessions, created_at, updated_at
"#;

/// Repository for the race calendar
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or fully overwrite an event keyed by `(season_year, event_id)`.
    pub async fn upsert(&self, schedule: &EventSchedule) -> Result<Event> {
        let query = format!(
            r#"
            INSERT INTO events (
                event_id, season_year, name, sprint_flag,
                weekend_start, weekend_end, sessions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (season_year, event_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                sprint_flag = EXCLUDED.sprint_flag,
                weekend_start = EXCLUDED.weekend_start,
                weekend_end = EXCLUDED.weekend_end,
                sessions = EXCLUDED.sessions,
                updated_at = NOW()
            RETURNING {EVENT_COLUMNS}
            "#
        );

        let event = sqlx::query_as::<_, Event>(&query)
            .bind(&schedule.event_id)
            .bind(schedule.season_year)
            .bind(&schedule.name)
            .bind(schedule.sprint_flag)
            .bind(schedule.weekend_start)
            .bind(schedule.weekend_end)
            .bind(Json(&schedule.sessions))
            .fetch_one(self.pool)
            .await?;

        Ok(event)
    }

    pub async fn find(&self, event_id: &str, season_year: i32) -> Result<Event> {
        let query = format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE event_id = $1 AND season_year = $2
            "#
        );

        sqlx::query_as::<_, Event>(&query)
            .bind(event_id)
            .bind(season_year)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn list_by_season(&self, season_year: i32) -> Result<Vec<Event>> {
        let query = format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE season_year = $1
            ORDER BY weekend_start ASC
            "#
        );

        let events = sqlx::query_as::<_, Event>(&query)
            .bind(season_year)
            .fetch_all(self.pool)
            .await?;

        Ok(events)
    }

    /// Events of a season whose weekend ended strictly before `now`.
    pub async fn list_ended(&self, season_year: i32, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let query = format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE season_year = $1 AND weekend_end < $2
            ORDER BY weekend_end ASC
            "#
        );

        let events = sqlx::query_as::<_, Event>(&query)
            .bind(season_year)
            .bind(now)
            .fetch_all(self.pool)
            .await?;

        Ok(events)
    }
}
