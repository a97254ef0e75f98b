pub mod event;
pub mod leaderboard;
pub mod prediction;
pub mod scoring;
pub mod user;
