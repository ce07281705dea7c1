//! Warp profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::WarpProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for warp profile database operations.
#[derive(Clone)]
pub struct WarpProfileRepository {
    pool: PgPool,
}

impl WarpProfileRepository {
    /// Creates a new WarpProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new warp profile.
    pub async fn create(
        &self,
        store_id: Uuid,
        code: &str,
        name: &str,
        social_link: Option<&str>,
        is_active: bool,
    ) -> Result<WarpProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_warp_profile");
        let result = sqlx::query_as::<_, WarpProfileEntity>(
            r#"
            INSERT INTO warp_profiles (store_id, code, name, social_link, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, store_id, code, name, social_link, is_active, created_at, updated_at
            "#,
        )
        .bind(store_id)
        .bind(code)
        .bind(name)
        .bind(social_link)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an active profile by its public code within a store.
    pub async fn find_active_by_code(
        &self,
        store_id: Uuid,
        code: &str,
    ) -> Result<Option<WarpProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_warp_profile_by_code");
        let result = sqlx::query_as::<_, WarpProfileEntity>(
            r#"
            SELECT id, store_id, code, name, social_link, is_active, created_at, updated_at
            FROM warp_profiles
            WHERE store_id = $1 AND code = $2 AND is_active = TRUE
            "#,
        )
        .bind(store_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a profile by ID within a store (admin view, any state).
    pub async fn find_by_id_for_store(
        &self,
        id: Uuid,
        store_id: Uuid,
    ) -> Result<Option<WarpProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_warp_profile_by_id");
        let result = sqlx::query_as::<_, WarpProfileEntity>(
            r#"
            SELECT id, store_id, code, name, social_link, is_active, created_at, updated_at
            FROM warp_profiles
            WHERE id = $1 AND store_id = $2
            "#,
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List profiles for a store.
    pub async fn list_for_store(
        &self,
        store_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WarpProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_warp_profiles");
        let result = sqlx::query_as::<_, WarpProfileEntity>(
            r#"
            SELECT id, store_id, code, name, social_link, is_active, created_at, updated_at
            FROM warp_profiles
            WHERE store_id = $1
            ORDER BY code
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(store_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count profiles for a store.
    pub async fn count_for_store(&self, store_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_warp_profiles");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM warp_profiles WHERE store_id = $1")
                .bind(store_id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Partially update a profile; absent fields keep their value.
    pub async fn update(
        &self,
        id: Uuid,
        store_id: Uuid,
        name: Option<&str>,
        social_link: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<WarpProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_warp_profile");
        let result = sqlx::query_as::<_, WarpProfileEntity>(
            r#"
            UPDATE warp_profiles
            SET name = COALESCE($3, name),
                social_link = COALESCE($4, social_link),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING id, store_id, code, name, social_link, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(store_id)
        .bind(name)
        .bind(social_link)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
