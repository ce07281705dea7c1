//! Public song request display endpoint.

use axum::{extract::State, Json};
use domain::models::{SongRequest, SongRequestResponse};
use persistence::repositories::SongRequestRepository;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::StoreContext;

#[derive(Debug, Serialize)]
pub struct SongRequestListResponse {
    pub song_requests: Vec<SongRequestResponse>,
}

/// GET /api/v1/public/song-requests
///
/// Song requests currently inside their display window, paid
/// transactions only.
pub async fn visible_song_requests(
    State(state): State<AppState>,
    store: StoreContext,
) -> Result<Json<SongRequestListResponse>, ApiError> {
    let requests = SongRequestRepository::new(state.pool.clone())
        .visible_for_store(store.store.id)
        .await?;

    Ok(Json(SongRequestListResponse {
        song_requests: requests
            .into_iter()
            .map(|r| SongRequest::from(r).into())
            .collect(),
    }))
}
