use std::sync::Arc;

use importer::CalendarSync;
use scoring::{PredictionService, ScoringScheduler};
use storage::{EventStore, LeaderboardStore, UserStore};

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventStore>,
    pub users: Arc<dyn UserStore>,
    pub leaderboard: Arc<dyn LeaderboardStore>,
    pub predictions: PredictionService,
    pub calendar: Arc<CalendarSync>,
    pub scheduler: Arc<ScoringScheduler>,
}
