use storage::{EventStore, dto::event::EventSummary, error::Result, models::Event};

/// Synced calendar for a season, ordered by weekend start
pub async fn list_events(events: &dyn EventStore, season_year: i32) -> Result<Vec<EventSummary>> {
    let calendar = events.list_events(season_year).await?;
    Ok(calendar.into_iter().map(EventSummary::from).collect())
}

pub async fn get_event(events: &dyn EventStore, season_year: i32, event_id: &str) -> Result<Event> {
    events.find_event(event_id, season_year).await
}
