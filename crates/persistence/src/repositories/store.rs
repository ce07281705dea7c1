//! Store repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::StoreEntity;
use crate::metrics::QueryTimer;

/// Repository for store-related database operations.
#[derive(Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    /// Creates a new StoreRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new store.
    pub async fn create(
        &self,
        slug: &str,
        name: &str,
        timezone: &str,
    ) -> Result<StoreEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_store");
        let result = sqlx::query_as::<_, StoreEntity>(
            r#"
            INSERT INTO stores (slug, name, timezone)
            VALUES ($1, $2, $3)
            RETURNING id, slug, name, is_active, timezone, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(timezone)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a store by its slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<StoreEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_store_by_slug");
        let result = sqlx::query_as::<_, StoreEntity>(
            r#"
            SELECT id, slug, name, is_active, timezone, created_at, updated_at
            FROM stores
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a store by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StoreEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_store_by_id");
        let result = sqlx::query_as::<_, StoreEntity>(
            r#"
            SELECT id, slug, name, is_active, timezone, created_at, updated_at
            FROM stores
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all stores, newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<StoreEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_stores");
        let result = sqlx::query_as::<_, StoreEntity>(
            r#"
            SELECT id, slug, name, is_active, timezone, created_at, updated_at
            FROM stores
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count all stores.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_stores");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stores")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }
}
