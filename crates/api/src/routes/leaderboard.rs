//! Public leaderboard and activity feed.
//!
//! Both views are recomputed from paid transactions on every read;
//! nothing here is cached or persisted.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::{ActivityEntry, LeaderboardEntry};
use domain::services::leaderboard::{activity_log, top_supporters};
use persistence::repositories::TransactionRepository;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::StoreContext;

const DEFAULT_TOP: usize = 10;
const MAX_TOP: usize = 100;

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub entries: Vec<ActivityEntry>,
}

/// GET /api/v1/public/leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
    store: StoreContext,
    Query(query): Query<TopQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP).clamp(1, MAX_TOP);

    let paid: Vec<_> = TransactionRepository::new(state.pool.clone())
        .paid_for_store(store.store.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let mut entries = top_supporters(&paid);
    entries.truncate(limit);

    Ok(Json(LeaderboardResponse { entries }))
}

/// GET /api/v1/public/activity
///
/// Chronological feed of paid warps; `limit` keeps the most recent
/// entries.
pub async fn get_activity(
    State(state): State<AppState>,
    store: StoreContext,
    Query(query): Query<TopQuery>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP).clamp(1, MAX_TOP);

    let paid: Vec<_> = TransactionRepository::new(state.pool.clone())
        .paid_for_store(store.store.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let mut entries = activity_log(&paid);
    if entries.len() > limit {
        entries.drain(..entries.len() - limit);
    }

    Ok(Json(ActivityResponse { entries }))
}
