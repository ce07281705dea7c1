//! Admin user domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an admin user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    /// Platform operator; manages stores, not scoped to one.
    Superadmin,
    /// Store owner; scoped to a single store.
    Owner,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Superadmin => "superadmin",
            AdminRole::Owner => "owner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "superadmin" => Some(AdminRole::Superadmin),
            "owner" => Some(AdminRole::Owner),
            _ => None,
        }
    }
}

/// An authenticated dashboard user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminUser {
    pub id: Uuid,
    /// Store scope; None for superadmins.
    pub store_id: Option<Uuid>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(AdminRole::parse("owner"), Some(AdminRole::Owner));
        assert_eq!(AdminRole::parse("superadmin"), Some(AdminRole::Superadmin));
        assert_eq!(AdminRole::parse("root"), None);
        assert_eq!(AdminRole::Owner.as_str(), "owner");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = AdminUser {
            id: Uuid::new_v4(),
            store_id: None,
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: AdminRole::Superadmin,
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("admin@example.com"));
    }
}
