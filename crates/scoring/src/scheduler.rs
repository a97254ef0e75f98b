//! Periodic detection of finished weekends and the manual scoring trigger.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Duration, Utc};
use storage::EventStore;
use storage::models::Event;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info};

use crate::engine::{ScoringEngine, ScoringOutcome};
use crate::error::{Result, ScoringError};
use crate::marker::ScoredEvents;

/// Where an event sits relative to its scoring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringWindow {
    /// The weekend has not ended yet.
    Unelapsed,
    /// Ended, but results may still be provisional.
    Buffering,
    Due,
}

pub fn scoring_window(event: &Event, now: DateTime<Utc>, buffer: Duration) -> ScoringWindow {
    if now < event.weekend_end {
        ScoringWindow::Unelapsed
    } else if now < event.weekend_end + buffer {
        ScoringWindow::Buffering
    } else {
        ScoringWindow::Due
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub buffer: Duration,
    pub marker_ttl: StdDuration,
    /// Six-field cron expression (seconds first).
    pub cron: String,
    pub startup_delay: StdDuration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            buffer: Duration::hours(4),
            marker_ttl: StdDuration::from_secs(168 * 3600),
            cron: "0 30 * * * *".to_string(),
            startup_delay: StdDuration::from_secs(10),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub candidates: usize,
    pub scored: usize,
    pub buffering: usize,
    pub already_scored: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct ManualScoreOutcome {
    pub event_name: String,
    pub outcome: ScoringOutcome,
}

pub struct ScoringScheduler {
    events: Arc<dyn EventStore>,
    engine: ScoringEngine,
    marker: ScoredEvents,
    config: SchedulerConfig,
}

impl ScoringScheduler {
    pub fn new(events: Arc<dyn EventStore>, engine: ScoringEngine, config: SchedulerConfig) -> Self {
        Self {
            events,
            engine,
            marker: ScoredEvents::new(config.marker_ttl),
            config,
        }
    }

    pub fn marker(&self) -> &ScoredEvents {
        &self.marker
    }

    /// One scan over the current season. A failing event is logged and left
    /// unmarked so the next tick retries it; the scan carries on.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Result<TickReport> {
        let season_year = now.year();
        let ended = self.events.list_ended_events(season_year, now).await?;

        let mut report = TickReport {
            candidates: ended.len(),
            ..Default::default()
        };

        for event in ended {
            if self.marker.contains(&event.event_id, event.season_year) {
                report.already_scored += 1;
                continue;
            }

            match scoring_window(&event, now, self.config.buffer) {
                ScoringWindow::Unelapsed => continue,
                ScoringWindow::Buffering => {
                    debug!("Event {} ended, waiting for results buffer", event.key());
                    report.buffering += 1;
                    continue;
                }
                ScoringWindow::Due => {}
            }

            info!("Scoring completed event {} ({})", event.key(), event.name);
            match self
                .engine
                .score(&event.event_id, event.season_year, event.sprint_flag)
                .await
            {
                Ok(outcome) => {
                    self.marker.mark(&event.event_id, event.season_year).await;
                    info!(
                        "Scored {} predictions for {}",
                        outcome.predictions_scored,
                        event.key()
                    );
                    report.scored += 1;
                }
                Err(e) => {
                    error!("Failed to score event {}: {}", event.key(), e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Scores one event immediately, ignoring the buffer and the marker.
    pub async fn manual_score(&self, event_id: &str, season_year: i32) -> Result<ManualScoreOutcome> {
        let event = self
            .events
            .find_event(event_id, season_year)
            .await
            .map_err(ScoringError::not_found("Event"))?;

        info!("Manual scoring triggered for {}", event.key());
        let outcome = self
            .engine
            .score(&event.event_id, event.season_year, event.sprint_flag)
            .await?;
        self.marker.mark(&event.event_id, event.season_year).await;

        Ok(ManualScoreOutcome {
            event_name: event.name,
            outcome,
        })
    }

    async fn tick_logged(&self) {
        match self.run_tick(Utc::now()).await {
            Ok(report) if report.candidates > 0 => info!("Scoring tick finished: {:?}", report),
            Ok(_) => debug!("Scoring tick found no ended events"),
            Err(e) => error!("Error checking for completed events: {}", e),
        }
    }

    /// Registers the recurring tick and a one-shot run shortly after startup.
    /// The returned handle must be kept alive for the jobs to keep firing.
    pub async fn start(self: Arc<Self>) -> Result<JobScheduler> {
        let scheduler = JobScheduler::new().await?;

        let recurring = Arc::clone(&self);
        let hourly = Job::new_async(self.config.cron.as_str(), move |_id, _lock| {
            let this = Arc::clone(&recurring);
            Box::pin(async move {
                this.tick_logged().await;
            })
        })?;
        scheduler.add(hourly).await?;

        let initial = Arc::clone(&self);
        let startup = Job::new_one_shot_async(self.config.startup_delay, move |_id, _lock| {
            let this = Arc::clone(&initial);
            Box::pin(async move {
                this.tick_logged().await;
            })
        })?;
        scheduler.add(startup).await?;

        scheduler.start().await?;
        info!(
            "Scoring scheduler started (cron '{}', buffer {}h)",
            self.config.cron,
            self.config.buffer.num_hours()
        );
        Ok(scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use importer::SessionListing;
    use importer::testing::{ScriptedProvider, qualifying_entry, race_entry};
    use storage::UserStore;
    use storage::memory::MemoryStore;
    use storage::models::{EventSchedule, Picks};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn schedule(event_id: &str, weekend_end: DateTime<Utc>) -> EventSchedule {
        EventSchedule {
            event_id: event_id.to_string(),
            season_year: weekend_end.year(),
            name: format!("{} Grand Prix", event_id),
            sprint_flag: false,
            weekend_start: weekend_end - Duration::hours(50),
            weekend_end,
            sessions: vec![],
        }
    }

    fn add_results(provider: &ScriptedProvider, event_id: &str) {
        provider.add_session(
            event_id,
            SessionListing::Qualifying,
            "q",
            "Qualifying",
            vec![
                qualifying_entry("Norris", Some(1)),
                qualifying_entry("Piastri", Some(2)),
                qualifying_entry("Verstappen", Some(3)),
            ],
        );
        provider.add_session(
            event_id,
            SessionListing::Races,
            "r",
            "MainRace",
            vec![
                race_entry("Norris", Some(1)),
                race_entry("Piastri", Some(2)),
                race_entry("Verstappen", Some(3)),
            ],
        );
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        provider: Arc<ScriptedProvider>,
        scheduler: ScoringScheduler,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let provider = Arc::new(ScriptedProvider::new());
        let engine = ScoringEngine::new(provider.clone(), store.clone());
        let scheduler = ScoringScheduler::new(store.clone(), engine, SchedulerConfig::default());
        Fixture {
            store,
            provider,
            scheduler,
        }
    }

    fn midseason() -> DateTime<Utc> {
        // Mid-year so "now minus a few hours" stays in the same season.
        let now = Utc::now();
        now.with_day(15).and_then(|d| d.with_month(6)).unwrap_or(now)
    }

    #[test]
    fn test_window_transitions() {
        let end = Utc::now();
        let event = Event {
            event_id: "gp".to_string(),
            season_year: 2025,
            name: "GP".to_string(),
            sprint_flag: false,
            weekend_start: end - Duration::hours(50),
            weekend_end: end,
            sessions: vec![],
            created_at: end,
            updated_at: end,
        };
        let buffer = Duration::hours(4);

        assert_eq!(
            scoring_window(&event, end - Duration::seconds(1), buffer),
            ScoringWindow::Unelapsed
        );
        assert_eq!(scoring_window(&event, end, buffer), ScoringWindow::Buffering);
        assert_eq!(
            scoring_window(&event, end + Duration::minutes(239), buffer),
            ScoringWindow::Buffering
        );
        assert_eq!(
            scoring_window(&event, end + Duration::hours(4), buffer),
            ScoringWindow::Due
        );
    }

    #[tokio::test]
    async fn test_event_inside_buffer_is_not_scored() {
        let f = fixture();
        let now = midseason();
        f.store
            .upsert_event(&schedule("bahrain", now - Duration::hours(2)))
            .await
            .unwrap();
        add_results(&f.provider, "bahrain");

        let report = f.scheduler.run_tick(now).await.unwrap();

        assert_eq!(report.buffering, 1);
        assert_eq!(report.scored, 0);
        assert_eq!(f.provider.result_fetches(), 0);
        assert!(!f.scheduler.marker().contains("bahrain", now.year()));
    }

    #[tokio::test]
    async fn test_due_event_scored_once() {
        let f = fixture();
        let now = midseason();
        let event = f
            .store
            .upsert_event(&schedule("bahrain", now - Duration::hours(5)))
            .await
            .unwrap();
        let user = f.store.find_or_create_user("alice").await.unwrap();
        f.store.insert_prediction(
            user.user_id,
            &event,
            Picks {
                race: names(&["norris", "piastri", "verstappen"]),
                ..Default::default()
            },
        );
        add_results(&f.provider, "bahrain");

        let first = f.scheduler.run_tick(now).await.unwrap();
        assert_eq!(first.scored, 1);
        assert_eq!(f.store.predictions()[0].score.total, 24);
        assert!(f.scheduler.marker().contains("bahrain", event.season_year));

        let fetches = f.provider.result_fetches();
        let second = f
            .scheduler
            .run_tick(now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(second.already_scored, 1);
        assert_eq!(second.scored, 0);
        assert_eq!(f.provider.result_fetches(), fetches);
        assert_eq!(f.store.score_writes(), 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_scan() {
        let f = fixture();
        let now = midseason();
        f.store
            .upsert_event(&schedule("bahrain", now - Duration::hours(30)))
            .await
            .unwrap();
        f.store
            .upsert_event(&schedule("jeddah", now - Duration::hours(6)))
            .await
            .unwrap();
        // No results scripted for bahrain.
        add_results(&f.provider, "jeddah");

        let report = f.scheduler.run_tick(now).await.unwrap();

        assert_eq!(report.candidates, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.scored, 1);
        assert!(!f.scheduler.marker().contains("bahrain", now.year()));
        assert!(f.scheduler.marker().contains("jeddah", now.year()));
    }

    #[tokio::test]
    async fn test_unmarked_event_retried_on_next_tick() {
        let f = fixture();
        let now = midseason();
        f.store
            .upsert_event(&schedule("bahrain", now - Duration::hours(5)))
            .await
            .unwrap();

        let report = f.scheduler.run_tick(now).await.unwrap();
        assert_eq!(report.failed, 1);

        add_results(&f.provider, "bahrain");
        let report = f
            .scheduler
            .run_tick(now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(report.scored, 1);
    }

    #[tokio::test]
    async fn test_future_and_other_season_events_ignored() {
        let f = fixture();
        let now = midseason();
        f.store
            .upsert_event(&schedule("miami", now + Duration::days(5)))
            .await
            .unwrap();
        let mut last_year = schedule("abu_dhabi", now - Duration::days(200));
        last_year.season_year = now.year() - 1;
        f.store.upsert_event(&last_year).await.unwrap();

        let report = f.scheduler.run_tick(now).await.unwrap();
        assert_eq!(report, TickReport::default());
    }

    #[tokio::test]
    async fn test_manual_score_bypasses_buffer_and_marks() {
        let f = fixture();
        let now = Utc::now();
        let event = f
            .store
            .upsert_event(&schedule("bahrain", now - Duration::minutes(30)))
            .await
            .unwrap();
        add_results(&f.provider, "bahrain");

        let manual = f
            .scheduler
            .manual_score("bahrain", event.season_year)
            .await
            .unwrap();

        assert_eq!(manual.event_name, "bahrain Grand Prix");
        assert_eq!(manual.outcome.actual.qualifying, names(&["norris", "piastri", "verstappen"]));
        assert!(f.scheduler.marker().contains("bahrain", event.season_year));
    }

    #[tokio::test]
    async fn test_manual_score_rescoring_already_marked_event() {
        let f = fixture();
        let now = Utc::now();
        let event = f
            .store
            .upsert_event(&schedule("bahrain", now - Duration::hours(10)))
            .await
            .unwrap();
        add_results(&f.provider, "bahrain");
        f.scheduler.marker().mark("bahrain", event.season_year).await;

        let manual = f.scheduler.manual_score("bahrain", event.season_year).await;
        assert!(manual.is_ok());
        assert!(f.provider.result_fetches() > 0);
    }

    #[tokio::test]
    async fn test_manual_score_unknown_event() {
        let f = fixture();
        let err = f.scheduler.manual_score("nowhere", 2025).await.unwrap_err();
        assert!(matches!(err, ScoringError::NotFound(ref what) if what == "Event"));
    }

    #[tokio::test]
    async fn test_manual_and_scheduled_runs_agree() {
        let f = fixture();
        let now = midseason();
        let event = f
            .store
            .upsert_event(&schedule("bahrain", now - Duration::hours(8)))
            .await
            .unwrap();
        let user = f.store.find_or_create_user("alice").await.unwrap();
        f.store.insert_prediction(
            user.user_id,
            &event,
            Picks {
                qualifying: names(&["piastri", "norris"]),
                ..Default::default()
            },
        );
        add_results(&f.provider, "bahrain");

        let (tick, manual) = tokio::join!(
            f.scheduler.run_tick(now),
            f.scheduler.manual_score("bahrain", event.season_year)
        );
        tick.unwrap();
        manual.unwrap();

        let score = f.store.predictions()[0].score;
        assert_eq!(score.qualifying, 4);
        assert_eq!(score.total, 4);
    }
}
