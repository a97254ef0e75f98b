use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Event;

#[derive(Debug, Serialize, ToSchema)]
pub struct EventSummary {
    pub event_id: String,
    pub season_year: i32,
    pub name: String,
    pub sprint_flag: bool,
    pub weekend_start: DateTime<Utc>,
    pub weekend_end: DateTime<Utc>,
}

impl From<Event> for EventSummary {
    fn from(event: Event) -> Self {
        Self {
            event_id: event.event_id,
            season_year: event.season_year,
            name: event.name,
            sprint_flag: event.sprint_flag,
            weekend_start: event.weekend_start,
            weekend_end: event.weekend_end,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, ToSchema)]
pub struct CalendarSyncResponse {
    pub season_year: i32,
    pub synced: usize,
    pub skipped: usize,
}
