//! Admin authentication service.
//!
//! Dashboard admins log in with email and password, receiving a
//! short-lived access token and a refresh token. Refresh rotates both
//! tokens and re-checks the account so deactivated admins lose access
//! at the next rotation.

use persistence::repositories::AdminUserRepository;
use serde::{Deserialize, Serialize};
use shared::jwt::{extract_admin_id, JwtConfig};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Handles admin login and token refresh.
#[derive(Clone)]
pub struct AuthService {
    admins: AdminUserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            admins: AdminUserRepository::new(pool),
            jwt,
        }
    }

    /// Verify credentials and issue a token pair.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        request.validate()?;

        let admin = self
            .admins
            .find_active_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

        let valid = shared::password::verify_password(&request.password, &admin.password_hash)
            .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            tracing::warn!(email = %request.email, "Failed login attempt");
            return Err(ApiError::Unauthorized("Invalid email or password".into()));
        }

        let admin = admin.into_domain();
        tracing::info!(admin_id = %admin.id, role = %admin.role.as_str(), "Admin logged in");
        self.issue_tokens(admin.id, admin.role.as_str(), admin.store_id)
    }

    /// Rotate a refresh token into a fresh token pair.
    pub async fn refresh(&self, request: &RefreshRequest) -> Result<TokenResponse, ApiError> {
        let claims = self.jwt.validate_refresh_token(&request.refresh_token)?;
        let admin_id = extract_admin_id(&claims)?;

        let admin = self
            .admins
            .find_by_id(admin_id)
            .await?
            .filter(|a| a.is_active)
            .ok_or_else(|| ApiError::Unauthorized("Account is no longer active".into()))?
            .into_domain();

        self.issue_tokens(admin.id, admin.role.as_str(), admin.store_id)
    }

    fn issue_tokens(
        &self,
        admin_id: uuid::Uuid,
        role: &str,
        store_id: Option<uuid::Uuid>,
    ) -> Result<TokenResponse, ApiError> {
        let (access_token, _) = self.jwt.generate_access_token(admin_id, role, store_id)?;
        let (refresh_token, _) = self.jwt.generate_refresh_token(admin_id, role, store_id)?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }
}
