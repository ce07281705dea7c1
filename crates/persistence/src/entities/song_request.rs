//! Song request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::SongRequest;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the song_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct SongRequestEntity {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub store_id: Uuid,
    pub title: String,
    pub artist: Option<String>,
    pub message: Option<String>,
    pub display_from: Option<DateTime<Utc>>,
    pub display_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<SongRequestEntity> for SongRequest {
    fn from(e: SongRequestEntity) -> Self {
        Self {
            id: e.id,
            transaction_id: e.transaction_id,
            store_id: e.store_id,
            title: e.title,
            artist: e.artist,
            message: e.message,
            display_from: e.display_from,
            display_until: e.display_until,
            created_at: e.created_at,
        }
    }
}
