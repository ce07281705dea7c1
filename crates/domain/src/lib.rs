//! Domain models and pure domain services for the meeWarp backend.
//!
//! This crate is database- and transport-agnostic: models carry the
//! business-level shapes (stores, warp profiles, transactions, song
//! requests) and services hold pure logic such as leaderboard
//! aggregation.

pub mod models;
pub mod services;
