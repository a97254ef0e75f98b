//! Store seams consumed by the calendar, prediction and scoring services.
//!
//! `Database` implements each trait by delegating to the matching repository;
//! tests substitute in-memory implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Database;
use crate::dto::leaderboard::LeaderboardEntry;
use crate::dto::prediction::PicksUpdate;
use crate::error::Result;
use crate::models::{Event, EventSchedule, Prediction, Score, User};
use crate::repository::{
    event::EventRepository, leaderboard::LeaderboardRepository,
    prediction::PredictionRepository, user::UserRepository,
};

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn upsert_event(&self, schedule: &EventSchedule) -> Result<Event>;

    /// Fails with `StorageError::NotFound` for an unknown event.
    async fn find_event(&self, event_id: &str, season_year: i32) -> Result<Event>;

    async fn list_events(&self, season_year: i32) -> Result<Vec<Event>>;

    async fn list_ended_events(&self, season_year: i32, now: DateTime<Utc>) -> Result<Vec<Event>>;
}

#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Atomic, lock-conditional upsert. `None` means the lock rejected it.
    async fn upsert_picks(
        &self,
        user_id: Uuid,
        event_id: &str,
        season_year: i32,
        picks: &PicksUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Prediction>>;

    async fn find_prediction(
        &self,
        user_id: Uuid,
        event_id: &str,
        season_year: i32,
    ) -> Result<Option<Prediction>>;

    async fn list_for_event(&self, event_id: &str, season_year: i32) -> Result<Vec<Prediction>>;

    async fn save_score(&self, prediction_id: Uuid, score: &Score) -> Result<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_or_create_user(&self, username: &str) -> Result<User>;

    async fn find_user(&self, user_id: Uuid) -> Result<User>;
}

/// Read-only standings over scored predictions.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    async fn season_leaderboard(&self, season_year: i32) -> Result<Vec<LeaderboardEntry>>;

    async fn event_leaderboard(
        &self,
        event_id: &str,
        season_year: i32,
    ) -> Result<Vec<LeaderboardEntry>>;
}

#[async_trait]
impl EventStore for Database {
    async fn upsert_event(&self, schedule: &EventSchedule) -> Result<Event> {
        EventRepository::new(self.pool()).upsert(schedule).await
    }

    async fn find_event(&self, event_id: &str, season_year: i32) -> Result<Event> {
        EventRepository::new(self.pool())
            .find(event_id, season_year)
            .await
    }

    async fn list_events(&self, season_year: i32) -> Result<Vec<Event>> {
        EventRepository::new(self.pool())
            .list_by_season(season_year)
            .await
    }

    async fn list_ended_events(&self, season_year: i32, now: DateTime<Utc>) -> Result<Vec<Event>> {
        EventRepository::new(self.pool())
            .list_ended(season_year, now)
            .await
    }
}

#[async_trait]
impl PredictionStore for Database {
    async fn upsert_picks(
        &self,
        user_id: Uuid,
        event_id: &str,
        season_year: i32,
        picks: &PicksUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Prediction>> {
        PredictionRepository::new(self.pool())
            .upsert_picks(user_id, event_id, season_year, picks, now)
            .await
    }

    async fn find_prediction(
        &self,
        user_id: Uuid,
        event_id: &str,
        season_year: i32,
    ) -> Result<Option<Prediction>> {
        PredictionRepository::new(self.pool())
            .find(user_id, event_id, season_year)
            .await
    }

    async fn list_for_event(&self, event_id: &str, season_year: i32) -> Result<Vec<Prediction>> {
        PredictionRepository::new(self.pool())
            .list_for_event(event_id, season_year)
            .await
    }

    async fn save_score(&self, prediction_id: Uuid, score: &Score) -> Result<()> {
        PredictionRepository::new(self.pool())
            .save_score(prediction_id, score)
            .await
    }
}

#[async_trait]
impl UserStore for Database {
    async fn find_or_create_user(&self, username: &str) -> Result<User> {
        UserRepository::new(self.pool())
            .find_or_create(username)
            .await
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User> {
        UserRepository::new(self.pool()).find_by_id(user_id).await
    }
}

#[async_trait]
impl LeaderboardStore for Database {
    async fn season_leaderboard(&self, season_year: i32) -> Result<Vec<LeaderboardEntry>> {
        LeaderboardRepository::new(self.pool()).season(season_year).await
    }

    async fn event_leaderboard(
        &self,
        event_id: &str,
        season_year: i32,
    ) -> Result<Vec<LeaderboardEntry>> {
        LeaderboardRepository::new(self.pool())
            .event(event_id, season_year)
            .await
    }
}
