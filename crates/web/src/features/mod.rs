pub mod admin;
pub mod events;
pub mod leaderboard;
pub mod predictions;
pub mod users;
