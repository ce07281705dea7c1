//! Store entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Store;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the stores table.
#[derive(Debug, Clone, FromRow)]
pub struct StoreEntity {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoreEntity> for Store {
    fn from(e: StoreEntity) -> Self {
        Self {
            id: e.id,
            slug: e.slug,
            name: e.name,
            is_active: e.is_active,
            timezone: e.timezone,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
