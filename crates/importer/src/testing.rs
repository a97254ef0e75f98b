//! Scripted `RaceDataProvider` for tests of calendar sync, normalization and
//! scoring. Compiled for tests and behind the `testing` feature only.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{ImporterError, Result};
use crate::traits::{
    RaceDataProvider, ResultEntry, SessionDescriptor, SessionListing, UpstreamEvent,
};

type SessionKey = (String, SessionListing);
type ResultKey = (String, SessionListing, String);

#[derive(Default)]
struct Script {
    seasons: HashMap<i32, Vec<UpstreamEvent>>,
    sessions: HashMap<SessionKey, Vec<SessionDescriptor>>,
    results: HashMap<ResultKey, Vec<ResultEntry>>,
    drivers: HashMap<String, String>,
    rate_limited: bool,
}

#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<Script>,
    result_fetches: AtomicUsize,
    driver_lookups: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_season(&self, season_year: i32, events: Vec<UpstreamEvent>) {
        let mut script = self.script.lock().expect("script poisoned");
        script.seasons.insert(season_year, events);
    }

    pub fn add_session(
        &self,
        event_id: &str,
        listing: SessionListing,
        session_id: &str,
        session_type: &str,
        entries: Vec<ResultEntry>,
    ) {
        let mut script = self.script.lock().expect("script poisoned");
        script
            .sessions
            .entry((event_id.to_string(), listing))
            .or_default()
            .push(SessionDescriptor {
                id: session_id.to_string(),
                session_type: session_type.to_string(),
            });
        script.results.insert(
            (event_id.to_string(), listing, session_id.to_string()),
            entries,
        );
    }

    pub fn add_driver(&self, driver_id: &str, family_name: &str) {
        let mut script = self.script.lock().expect("script poisoned");
        script
            .drivers
            .insert(driver_id.to_string(), family_name.to_string());
    }

    /// Every subsequent call fails as if the retry budget were exhausted.
    pub fn fail_with_rate_limit(&self) {
        self.script.lock().expect("script poisoned").rate_limited = true;
    }

    /// Number of `session_results` calls served so far.
    pub fn result_fetches(&self) -> usize {
        self.result_fetches.load(Ordering::SeqCst)
    }

    /// Number of `driver_family_name` calls served so far.
    pub fn driver_lookups(&self) -> usize {
        self.driver_lookups.load(Ordering::SeqCst)
    }

    fn check_rate_limit(&self, url: &str) -> Result<()> {
        if self.script.lock().expect("script poisoned").rate_limited {
            return Err(ImporterError::RateLimited {
                url: url.to_string(),
                attempts: 6,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RaceDataProvider for ScriptedProvider {
    async fn season_events(&self, season_year: i32) -> Result<Vec<UpstreamEvent>> {
        self.check_rate_limit("season_events")?;
        let script = self.script.lock().expect("script poisoned");
        Ok(script.seasons.get(&season_year).cloned().unwrap_or_default())
    }

    async fn event_sessions(
        &self,
        event_id: &str,
        listing: SessionListing,
    ) -> Result<Vec<SessionDescriptor>> {
        self.check_rate_limit("event_sessions")?;
        let script = self.script.lock().expect("script poisoned");
        Ok(script
            .sessions
            .get(&(event_id.to_string(), listing))
            .cloned()
            .unwrap_or_default())
    }

    async fn session_results(
        &self,
        event_id: &str,
        listing: SessionListing,
        session_id: &str,
    ) -> Result<Vec<ResultEntry>> {
        self.check_rate_limit("session_results")?;
        self.result_fetches.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().expect("script poisoned");
        Ok(script
            .results
            .get(&(event_id.to_string(), listing, session_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn driver_family_name(&self, driver_id: &str) -> Result<Option<String>> {
        self.check_rate_limit("driver_family_name")?;
        self.driver_lookups.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().expect("script poisoned");
        Ok(script.drivers.get(driver_id).cloned())
    }

    fn name(&self) -> &'static str {
        "Scripted"
    }
}

pub fn race_entry(family_name: &str, finished_position: Option<u32>) -> ResultEntry {
    ResultEntry {
        driver_id: None,
        family_name: Some(family_name.to_string()),
        position: None,
        finished_position,
    }
}

pub fn qualifying_entry(family_name: &str, position: Option<u32>) -> ResultEntry {
    ResultEntry {
        driver_id: None,
        family_name: Some(family_name.to_string()),
        position,
        finished_position: None,
    }
}

/// Entry that names its driver only by provider id.
pub fn driver_id_entry(driver_id: &str, rank: Option<u32>, listing: SessionListing) -> ResultEntry {
    let (position, finished_position) = match listing {
        SessionListing::Qualifying => (rank, None),
        SessionListing::Races => (None, rank),
    };
    ResultEntry {
        driver_id: Some(driver_id.to_string()),
        family_name: None,
        position,
        finished_position,
    }
}
