//! Warp profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A display profile that warps are directed at, looked up publicly by code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WarpProfile {
    pub id: Uuid,
    pub store_id: Uuid,
    /// Short code unique within the store (e.g. "DJ001").
    pub code: String,
    pub name: String,
    pub social_link: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Request payload for creating a warp profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateWarpProfileRequest {
    #[validate(length(min = 1, max = 32, message = "Code must be 1-32 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[validate(url(message = "Invalid URL format"))]
    pub social_link: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Request payload for updating a warp profile (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateWarpProfileRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,

    #[validate(url(message = "Invalid URL format"))]
    pub social_link: Option<String>,

    pub is_active: Option<bool>,
}

/// Response payload for warp profile operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WarpProfileResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub social_link: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<WarpProfile> for WarpProfileResponse {
    fn from(p: WarpProfile) -> Self {
        Self {
            id: p.id,
            code: p.code,
            name: p.name,
            social_link: p.social_link,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_valid() {
        let request = CreateWarpProfileRequest {
            code: "DJ001".to_string(),
            name: "DJ Example".to_string(),
            social_link: Some("https://example.com/dj".to_string()),
            is_active: true,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_empty_code_rejected() {
        let request = CreateWarpProfileRequest {
            code: String::new(),
            name: "DJ Example".to_string(),
            social_link: None,
            is_active: true,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_bad_url_rejected() {
        let request = CreateWarpProfileRequest {
            code: "DJ001".to_string(),
            name: "DJ Example".to_string(),
            social_link: Some("not a url".to_string()),
            is_active: true,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_from_profile() {
        let profile = WarpProfile {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            code: "DJ001".to_string(),
            name: "DJ Example".to_string(),
            social_link: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response: WarpProfileResponse = profile.clone().into();
        assert_eq!(response.code, "DJ001");
        assert_eq!(response.id, profile.id);
    }
}
