use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One row of a standings table. For a season this is the sum of every
/// scored prediction of the user; for a single event it is that prediction's
/// total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    /// `Unknown` when the user row is gone.
    pub username: String,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}
