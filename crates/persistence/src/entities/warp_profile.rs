//! Warp profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::WarpProfile;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the warp_profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct WarpProfileEntity {
    pub id: Uuid,
    pub store_id: Uuid,
    pub code: String,
    pub name: String,
    pub social_link: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WarpProfileEntity> for WarpProfile {
    fn from(e: WarpProfileEntity) -> Self {
        Self {
            id: e.id,
            store_id: e.store_id,
            code: e.code,
            name: e.name,
            social_link: e.social_link,
            is_active: e.is_active,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
