use storage::{
    EventStore, LeaderboardStore, dto::leaderboard::LeaderboardEntry, error::Result,
};

pub async fn season_standings(
    leaderboard: &dyn LeaderboardStore,
    season_year: i32,
) -> Result<Vec<LeaderboardEntry>> {
    leaderboard.season_leaderboard(season_year).await
}

/// Unknown events are a 404 rather than an empty table
pub async fn event_standings(
    events: &dyn EventStore,
    leaderboard: &dyn LeaderboardStore,
    season_year: i32,
    event_id: &str,
) -> Result<Vec<LeaderboardEntry>> {
    events.find_event(event_id, season_year).await?;
    leaderboard.event_leaderboard(event_id, season_year).await
}
