//! HTTP route handlers.

pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod song_requests;
pub mod stores;
pub mod transactions;
pub mod warp_profiles;
pub mod webhooks;
