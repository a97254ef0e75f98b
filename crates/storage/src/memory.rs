//! In-memory stores with the same semantics as the PostgreSQL ones.
//!
//! Compiled for tests and behind the `memory` feature only.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::leaderboard::LeaderboardEntry;
use crate::dto::prediction::PicksUpdate;
use crate::error::{Result, StorageError};
use crate::models::{Event, EventSchedule, Picks, Prediction, Score, User};
use crate::store::{EventStore, LeaderboardStore, PredictionStore, UserStore};

type EventKey = (i32, String);
type PredictionKey = (Uuid, String, i32);

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    events: HashMap<EventKey, Event>,
    predictions: HashMap<PredictionKey, Prediction>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    score_writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save_score` calls served so far.
    pub fn score_writes(&self) -> usize {
        *self.score_writes.lock().expect("memory store poisoned")
    }

    pub fn predictions(&self) -> Vec<Prediction> {
        let tables = self.tables.lock().expect("memory store poisoned");
        let mut all: Vec<_> = tables.predictions.values().cloned().collect();
        all.sort_by_key(|p| p.created_at);
        all
    }

    /// Seeds a prediction directly, bypassing the lock condition.
    pub fn insert_prediction(&self, user_id: Uuid, event: &Event, picks: Picks) -> Prediction {
        let now = Utc::now();
        let prediction = Prediction {
            prediction_id: Uuid::new_v4(),
            user_id,
            event_id: event.event_id.clone(),
            season_year: event.season_year,
            picks,
            locked_at: event.weekend_start,
            score: Score::default(),
            scored_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut tables = self.tables.lock().expect("memory store poisoned");
        tables.predictions.insert(
            (user_id, event.event_id.clone(), event.season_year),
            prediction.clone(),
        );
        prediction
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn upsert_event(&self, schedule: &EventSchedule) -> Result<Event> {
        let now = Utc::now();
        let mut tables = self.tables.lock().expect("memory store poisoned");
        let key = (schedule.season_year, schedule.event_id.clone());
        let created_at = tables.events.get(&key).map_or(now, |e| e.created_at);

        let event = Event {
            event_id: schedule.event_id.clone(),
            season_year: schedule.season_year,
            name: schedule.name.clone(),
            sprint_flag: schedule.sprint_flag,
            weekend_start: schedule.weekend_start,
            weekend_end: schedule.weekend_end,
            sessions: schedule.sessions.clone(),
            created_at,
            updated_at: now,
        };
        tables.events.insert(key, event.clone());
        Ok(event)
    }

    async fn find_event(&self, event_id: &str, season_year: i32) -> Result<Event> {
        let tables = self.tables.lock().expect("memory store poisoned");
        tables
            .events
            .get(&(season_year, event_id.to_string()))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_events(&self, season_year: i32) -> Result<Vec<Event>> {
        let tables = self.tables.lock().expect("memory store poisoned");
        let mut events: Vec<_> = tables
            .events
            .values()
            .filter(|e| e.season_year == season_year)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.weekend_start);
        Ok(events)
    }

    async fn list_ended_events(&self, season_year: i32, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let mut events = self.list_events(season_year).await?;
        events.retain(|e| e.weekend_end < now);
        events.sort_by_key(|e| e.weekend_end);
        Ok(events)
    }
}

#[async_trait]
impl PredictionStore for MemoryStore {
    async fn upsert_picks(
        &self,
        user_id: Uuid,
        event_id: &str,
        season_year: i32,
        picks: &PicksUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Prediction>> {
        let mut tables = self.tables.lock().expect("memory store poisoned");
        if !tables.users.contains_key(&user_id) {
            return Err(StorageError::NotFound);
        }

        // Both paths require the event to still be open, as the SQL upsert
        // only reaches its conflict branch through the filtered SELECT
        let Some(event) = tables.events.get(&(season_year, event_id.to_string())) else {
            return Ok(None);
        };
        if event.weekend_start <= now {
            return Ok(None);
        }
        let weekend_start = event.weekend_start;

        let key = (user_id, event_id.to_string(), season_year);
        if let Some(existing) = tables.predictions.get_mut(&key) {
            if existing.locked_at <= now {
                return Ok(None);
            }
            picks.apply_to(&mut existing.picks);
            existing.updated_at = Utc::now();
            return Ok(Some(existing.clone()));
        }

        let mut stored = Picks::default();
        picks.apply_to(&mut stored);
        let created = Utc::now();
        let prediction = Prediction {
            prediction_id: Uuid::new_v4(),
            user_id,
            event_id: event_id.to_string(),
            season_year,
            picks: stored,
            locked_at: weekend_start,
            score: Score::default(),
            scored_at: None,
            created_at: created,
            updated_at: created,
        };
        tables.predictions.insert(key, prediction.clone());
        Ok(Some(prediction))
    }

    async fn find_prediction(
        &self,
        user_id: Uuid,
        event_id: &str,
        season_year: i32,
    ) -> Result<Option<Prediction>> {
        let tables = self.tables.lock().expect("memory store poisoned");
        Ok(tables
            .predictions
            .get(&(user_id, event_id.to_string(), season_year))
            .cloned())
    }

    async fn list_for_event(&self, event_id: &str, season_year: i32) -> Result<Vec<Prediction>> {
        let tables = self.tables.lock().expect("memory store poisoned");
        let mut predictions: Vec<_> = tables
            .predictions
            .values()
            .filter(|p| p.event_id == event_id && p.season_year == season_year)
            .cloned()
            .collect();
        predictions.sort_by_key(|p| p.created_at);
        Ok(predictions)
    }

    async fn save_score(&self, prediction_id: Uuid, score: &Score) -> Result<()> {
        {
            let mut tables = self.tables.lock().expect("memory store poisoned");
            let prediction = tables
                .predictions
                .values_mut()
                .find(|p| p.prediction_id == prediction_id)
                .ok_or(StorageError::NotFound)?;
            prediction.score = *score;
            prediction.scored_at = Some(Utc::now());
        }
        *self.score_writes.lock().expect("memory store poisoned") += 1;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_or_create_user(&self, username: &str) -> Result<User> {
        let mut tables = self.tables.lock().expect("memory store poisoned");
        if let Some(user) = tables.users.values().find(|u| u.username == username) {
            return Ok(user.clone());
        }

        let user = User {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User> {
        let tables = self.tables.lock().expect("memory store poisoned");
        tables
            .users
            .get(&user_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

impl Tables {
    fn username_of(&self, user_id: Uuid) -> String {
        self.users
            .get(&user_id)
            .map_or_else(|| "Unknown".to_string(), |u| u.username.clone())
    }
}

fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.username.cmp(&b.username))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

#[async_trait]
impl LeaderboardStore for MemoryStore {
    async fn season_leaderboard(&self, season_year: i32) -> Result<Vec<LeaderboardEntry>> {
        let tables = self.tables.lock().expect("memory store poisoned");
        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        for prediction in tables
            .predictions
            .values()
            .filter(|p| p.season_year == season_year)
        {
            *totals.entry(prediction.user_id).or_default() += i64::from(prediction.score.total);
        }

        let mut entries: Vec<_> = totals
            .into_iter()
            .map(|(user_id, total)| LeaderboardEntry {
                user_id,
                username: tables.username_of(user_id),
                total,
            })
            .collect();
        rank(&mut entries);
        Ok(entries)
    }

    async fn event_leaderboard(
        &self,
        event_id: &str,
        season_year: i32,
    ) -> Result<Vec<LeaderboardEntry>> {
        let tables = self.tables.lock().expect("memory store poisoned");
        let mut entries: Vec<_> = tables
            .predictions
            .values()
            .filter(|p| p.event_id == event_id && p.season_year == season_year)
            .map(|p| LeaderboardEntry {
                user_id: p.user_id,
                username: tables.username_of(p.user_id),
                total: i64::from(p.score.total),
            })
            .collect();
        rank(&mut entries);
        Ok(entries)
    }
}
