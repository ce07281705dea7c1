//! Pure domain services.

pub mod leaderboard;
