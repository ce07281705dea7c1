//! Admin user entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AdminRole, AdminUser};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the admin_users table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUserEntity {
    pub id: Uuid,
    pub store_id: Option<Uuid>,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl AdminUserEntity {
    /// Converts into the domain model; unknown roles map to the least
    /// privileged one.
    pub fn into_domain(self) -> AdminUser {
        let role = AdminRole::parse(&self.role).unwrap_or(AdminRole::Owner);
        AdminUser {
            id: self.id,
            store_id: self.store_id,
            email: self.email,
            password_hash: self.password_hash,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_maps_to_owner() {
        let entity = AdminUserEntity {
            id: Uuid::new_v4(),
            store_id: None,
            email: "a@b.c".to_string(),
            password_hash: String::new(),
            role: "mystery".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        assert_eq!(entity.into_domain().role, AdminRole::Owner);
    }
}
