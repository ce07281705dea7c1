//! Derived leaderboard and activity types.
//!
//! These are never persisted; they are recomputed on read from the paid
//! transactions of a store.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A paid transaction row as fed into the aggregator.
#[derive(Debug, Clone)]
pub struct PaidWarp {
    pub customer_name: String,
    pub code: String,
    pub amount: i64,
    pub paid_at: DateTime<Utc>,
}

/// One supporter's aggregate on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LeaderboardEntry {
    pub customer_name: String,
    pub total_amount: i64,
    pub warp_count: i64,
    /// Timestamp of the supporter's earliest paid warp; used for ties.
    pub first_paid_at: DateTime<Utc>,
}

/// One chronological activity feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ActivityEntry {
    pub customer_name: String,
    pub code: String,
    pub amount: i64,
    pub paid_at: DateTime<Utc>,
}
