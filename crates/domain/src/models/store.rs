//! Store (tenant) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Represents a tenant (venue or streamer account).
///
/// Every other entity in the system is scoped to a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Store {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_timezone() -> String {
    "Asia/Bangkok".to_string()
}

/// Request payload for creating a store (superadmin only).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateStoreRequest {
    #[validate(length(min = 2, max = 64, message = "Slug must be 2-64 characters"))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Custom validator for URL-safe slugs.
fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    let valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid && !slug.starts_with('-') && !slug.ends_with('-') {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("slug_format");
        err.message = Some("Slug must be lowercase alphanumeric with inner dashes".into());
        Err(err)
    }
}

/// Response payload for store operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl From<Store> for StoreResponse {
    fn from(s: Store) -> Self {
        Self {
            id: s.id,
            slug: s.slug,
            name: s.name,
            is_active: s.is_active,
            timezone: s.timezone,
            created_at: s.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(slug: &str) -> CreateStoreRequest {
        CreateStoreRequest {
            slug: slug.to_string(),
            name: "Neon Bar".to_string(),
            timezone: default_timezone(),
        }
    }

    #[test]
    fn test_valid_slug_accepted() {
        assert!(request("neon-bar-2").validate().is_ok());
    }

    #[test]
    fn test_uppercase_slug_rejected() {
        assert!(request("NeonBar").validate().is_err());
    }

    #[test]
    fn test_slug_with_leading_dash_rejected() {
        assert!(request("-neon").validate().is_err());
        assert!(request("neon-").validate().is_err());
    }

    #[test]
    fn test_slug_too_short_rejected() {
        assert!(request("a").validate().is_err());
    }

    #[test]
    fn test_default_timezone() {
        assert_eq!(default_timezone(), "Asia/Bangkok");
    }

    #[test]
    fn test_store_response_from_store() {
        let store = Store {
            id: Uuid::new_v4(),
            slug: "neon-bar".to_string(),
            name: "Neon Bar".to_string(),
            is_active: true,
            timezone: "Asia/Bangkok".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response: StoreResponse = store.clone().into();
        assert_eq!(response.id, store.id);
        assert_eq!(response.slug, "neon-bar");
        assert!(response.is_active);
    }
}
