//! Admin user repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AdminUserEntity;
use crate::metrics::QueryTimer;

/// Repository for admin user database operations.
#[derive(Clone)]
pub struct AdminUserRepository {
    pool: PgPool,
}

impl AdminUserRepository {
    /// Creates a new AdminUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an active admin by email (login path).
    pub async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_admin_by_email");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT id, store_id, email, password_hash, role, is_active, created_at
            FROM admin_users
            WHERE lower(email) = lower($1) AND is_active = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an admin by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_admin_by_id");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT id, store_id, email, password_hash, role, is_active, created_at
            FROM admin_users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create an admin user.
    pub async fn create(
        &self,
        store_id: Option<Uuid>,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<AdminUserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_admin_user");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            INSERT INTO admin_users (store_id, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, store_id, email, password_hash, role, is_active, created_at
            "#,
        )
        .bind(store_id)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether any superadmin exists (used at startup bootstrap).
    pub async fn superadmin_exists(&self) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("superadmin_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM admin_users WHERE role = 'superadmin')",
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
