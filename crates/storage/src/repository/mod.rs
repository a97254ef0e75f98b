pub mod event;
pub mod leaderboard;
pub mod prediction;
pub mod user;
