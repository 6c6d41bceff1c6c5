pub mod completion;
pub mod error;
pub mod leaderboard_store;
