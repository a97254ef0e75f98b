use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use storage::EventStore;
use storage::models::{EventSchedule, Session, SessionType};
use tracing::{debug, info};

use crate::Result;
use crate::traits::{RaceDataProvider, UpstreamEvent};

/// Assumed main-race length when the provider reports no end time.
pub const ASSUMED_RACE_DURATION: Duration = Duration::hours(3);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub skipped: usize,
}

/// Pulls a season schedule from the provider and upserts it into the calendar.
pub struct CalendarSync {
    provider: Arc<dyn RaceDataProvider>,
    events: Arc<dyn EventStore>,
}

impl CalendarSync {
    pub fn new(provider: Arc<dyn RaceDataProvider>, events: Arc<dyn EventStore>) -> Self {
        Self { provider, events }
    }

    pub async fn sync(&self, season_year: i32) -> Result<SyncReport> {
        info!(
            "Syncing {} calendar from {}",
            season_year,
            self.provider.name()
        );
        let upstream = self.provider.season_events(season_year).await?;

        let mut report = SyncReport::default();
        for event in &upstream {
            let Some(schedule) = derive_schedule(event, season_year) else {
                debug!(
                    "Skipping {} ({}): first practice or main race has no start date",
                    event.name, event.id
                );
                report.skipped += 1;
                continue;
            };

            self.events.upsert_event(&schedule).await?;
            report.synced += 1;
        }

        info!(
            "Calendar {} synced: {} events stored, {} skipped",
            season_year, report.synced, report.skipped
        );
        Ok(report)
    }
}

/// Derives the weekend window of one upstream event.
///
/// Returns `None` when the event cannot be scheduled yet, i.e. when either the
/// first practice or the main race is missing a start date.
pub fn derive_schedule(event: &UpstreamEvent, season_year: i32) -> Option<EventSchedule> {
    let sessions: Vec<Session> = event
        .schedule
        .iter()
        .filter_map(|entry| {
            let session_type = SessionType::from(entry.session_type.clone()?);
            Some(Session {
                session_type,
                start_date: entry.start_date.as_deref().and_then(parse_timestamp),
                end_date: entry.end_date.as_deref().and_then(parse_timestamp),
            })
        })
        .collect();

    let first_practice = find_session(&sessions, &SessionType::FirstPractice)?;
    let main_race = find_session(&sessions, &SessionType::MainRace)?;

    let weekend_start = first_practice.start_date?;
    let race_start = main_race.start_date?;
    let weekend_end = main_race
        .end_date
        .unwrap_or(race_start + ASSUMED_RACE_DURATION);

    let sprint_flag = sessions
        .iter()
        .any(|s| s.session_type == SessionType::SprintRace);

    Some(EventSchedule {
        event_id: event.id.clone(),
        season_year,
        name: event.name.clone(),
        sprint_flag,
        weekend_start,
        weekend_end,
        sessions,
    })
}

fn find_session<'a>(sessions: &'a [Session], session_type: &SessionType) -> Option<&'a Session> {
    sessions.iter().find(|s| &s.session_type == session_type)
}

/// Accepts RFC 3339 timestamps and, failing that, zone-less ones taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.and_utc()))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;
    use crate::traits::ScheduleEntry;
    use chrono::TimeZone;
    use storage::memory::MemoryStore;

    fn entry(session_type: &str, start: Option<&str>, end: Option<&str>) -> ScheduleEntry {
        ScheduleEntry {
            session_type: Some(session_type.to_string()),
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    fn upstream(id: &str, schedule: Vec<ScheduleEntry>) -> UpstreamEvent {
        UpstreamEvent {
            id: id.to_string(),
            name: format!("{} Grand Prix", id),
            status: None,
            schedule,
        }
    }

    #[test]
    fn test_race_without_end_assumes_three_hours() {
        let event = upstream(
            "monza",
            vec![
                entry("FirstPractice", Some("2025-09-05T11:30:00Z"), None),
                entry("Qualifying", Some("2025-09-06T14:00:00Z"), None),
                entry("MainRace", Some("2025-09-07T13:00:00Z"), None),
            ],
        );

        let schedule = derive_schedule(&event, 2025).unwrap();
        assert_eq!(
            schedule.weekend_start,
            Utc.with_ymd_and_hms(2025, 9, 5, 11, 30, 0).unwrap()
        );
        assert_eq!(
            schedule.weekend_end,
            Utc.with_ymd_and_hms(2025, 9, 7, 16, 0, 0).unwrap()
        );
        assert!(!schedule.sprint_flag);
        assert_eq!(schedule.sessions.len(), 3);
    }

    #[test]
    fn test_reported_race_end_is_used() {
        let event = upstream(
            "spa",
            vec![
                entry("FirstPractice", Some("2025-07-25T10:30:00Z"), None),
                entry(
                    "MainRace",
                    Some("2025-07-27T13:00:00Z"),
                    Some("2025-07-27T14:35:00Z"),
                ),
            ],
        );

        let schedule = derive_schedule(&event, 2025).unwrap();
        assert_eq!(
            schedule.weekend_end,
            Utc.with_ymd_and_hms(2025, 7, 27, 14, 35, 0).unwrap()
        );
    }

    #[test]
    fn test_sprint_race_sets_sprint_flag() {
        let event = upstream(
            "miami",
            vec![
                entry("FirstPractice", Some("2025-05-02T16:30:00Z"), None),
                entry("SprintShootOut", Some("2025-05-02T20:30:00Z"), None),
                entry("SprintRace", Some("2025-05-03T16:00:00Z"), None),
                entry("MainRace", Some("2025-05-04T20:00:00Z"), None),
            ],
        );

        let schedule = derive_schedule(&event, 2025).unwrap();
        assert!(schedule.sprint_flag);
        assert_eq!(schedule.sessions[1].session_type, SessionType::SprintQualifying);
    }

    #[test]
    fn test_missing_start_dates_skip_event() {
        let no_fp1_start = upstream(
            "tbc",
            vec![
                entry("FirstPractice", None, None),
                entry("MainRace", Some("2025-12-07T13:00:00Z"), None),
            ],
        );
        assert!(derive_schedule(&no_fp1_start, 2025).is_none());

        let no_race = upstream(
            "tbc2",
            vec![entry("FirstPractice", Some("2025-12-05T13:00:00Z"), None)],
        );
        assert!(derive_schedule(&no_race, 2025).is_none());
    }

    #[test]
    fn test_zone_less_timestamps_are_utc() {
        assert_eq!(
            parse_timestamp("2025-03-14T01:30:00"),
            Some(Utc.with_ymd_and_hms(2025, 3, 14, 1, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-03-14T03:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2025, 3, 14, 1, 30, 0).unwrap())
        );
        assert_eq!(parse_timestamp("soon"), None);
    }

    #[tokio::test]
    async fn test_sync_upserts_and_overwrites() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.set_season(
            2025,
            vec![
                upstream(
                    "imola",
                    vec![
                        entry("FirstPractice", Some("2025-05-16T11:30:00Z"), None),
                        entry("MainRace", Some("2025-05-18T13:00:00Z"), None),
                    ],
                ),
                upstream("unscheduled", vec![]),
            ],
        );
        let store = Arc::new(MemoryStore::new());
        let sync = CalendarSync::new(provider.clone(), store.clone());

        let report = sync.sync(2025).await.unwrap();
        assert_eq!(report, SyncReport { synced: 1, skipped: 1 });

        // Re-sync with a moved race and an added sprint overwrites the stored fields
        provider.set_season(
            2025,
            vec![upstream(
                "imola",
                vec![
                    entry("FirstPractice", Some("2025-05-16T11:30:00Z"), None),
                    entry("SprintRace", Some("2025-05-17T11:00:00Z"), None),
                    entry("MainRace", Some("2025-05-18T14:00:00Z"), None),
                ],
            )],
        );
        sync.sync(2025).await.unwrap();

        let stored = store.find_event("imola", 2025).await.unwrap();
        assert!(stored.sprint_flag);
        assert_eq!(stored.sessions.len(), 3);
        assert_eq!(
            stored.weekend_end,
            Utc.with_ymd_and_hms(2025, 5, 18, 17, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_sync_propagates_provider_errors() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.fail_with_rate_limit();
        let store = Arc::new(MemoryStore::new());
        let sync = CalendarSync::new(provider, store);

        let result = sync.sync(2025).await;
        assert!(matches!(
            result,
            Err(crate::ImporterError::RateLimited { .. })
        ));
    }
}
