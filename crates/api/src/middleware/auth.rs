//! Admin JWT authentication middleware.
//!
//! Validates the Bearer token on dashboard routes and stores the
//! authenticated admin in request extensions. Expired sessions get a
//! distinct error code so the dashboard can force a re-login.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::AdminRole;
use shared::jwt::{extract_admin_id, Claims, JwtConfig};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated admin extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub admin_id: Uuid,
    pub role: AdminRole,
    /// Store scope; None for superadmins.
    pub store_id: Option<Uuid>,
}

impl AdminAuth {
    fn from_claims(claims: &Claims) -> Result<Self, ApiError> {
        let admin_id = extract_admin_id(claims)?;
        let role = AdminRole::parse(&claims.role)
            .ok_or_else(|| ApiError::Unauthorized("Unknown role in token".into()))?;

        Ok(Self {
            admin_id,
            role,
            store_id: claims.store_id,
        })
    }

    /// Validates an access token and returns the admin it identifies.
    pub fn validate(jwt: &JwtConfig, token: &str) -> Result<Self, ApiError> {
        let claims = jwt.validate_access_token(token)?;
        Self::from_claims(&claims)
    }

    /// Resolve the store this admin may act on.
    ///
    /// Owners are pinned to their own store and may not ask for another.
    /// Superadmins must name the store explicitly.
    pub fn store_scope(&self, requested: Option<Uuid>) -> Result<Uuid, ApiError> {
        match self.role {
            AdminRole::Owner => {
                let own = self
                    .store_id
                    .ok_or_else(|| ApiError::Forbidden("Owner token without store scope".into()))?;
                match requested {
                    Some(store_id) if store_id != own => {
                        Err(ApiError::Forbidden("Not your store".into()))
                    }
                    _ => Ok(own),
                }
            }
            AdminRole::Superadmin => requested
                .ok_or_else(|| ApiError::Validation("store_id query parameter is required".into())),
        }
    }

    /// Reject anyone below superadmin.
    pub fn require_superadmin(&self) -> Result<(), ApiError> {
        if self.role == AdminRole::Superadmin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Superadmin role required".into()))
        }
    }
}

/// Middleware that requires a valid admin access token.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return ApiError::Unauthorized("Missing or invalid Authorization header".into())
                .into_response();
        }
    };

    match AdminAuth::validate(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("Admin token rejected: {}", e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(store_id: Uuid) -> AdminAuth {
        AdminAuth {
            admin_id: Uuid::new_v4(),
            role: AdminRole::Owner,
            store_id: Some(store_id),
        }
    }

    fn superadmin() -> AdminAuth {
        AdminAuth {
            admin_id: Uuid::new_v4(),
            role: AdminRole::Superadmin,
            store_id: None,
        }
    }

    #[test]
    fn test_owner_scope_defaults_to_own_store() {
        let store_id = Uuid::new_v4();
        assert_eq!(owner(store_id).store_scope(None).unwrap(), store_id);
    }

    #[test]
    fn test_owner_may_name_own_store() {
        let store_id = Uuid::new_v4();
        assert_eq!(
            owner(store_id).store_scope(Some(store_id)).unwrap(),
            store_id
        );
    }

    #[test]
    fn test_owner_rejected_for_foreign_store() {
        let auth = owner(Uuid::new_v4());
        let result = auth.store_scope(Some(Uuid::new_v4()));
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_superadmin_must_name_store() {
        let result = superadmin().store_scope(None);
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let store_id = Uuid::new_v4();
        assert_eq!(superadmin().store_scope(Some(store_id)).unwrap(), store_id);
    }

    #[test]
    fn test_require_superadmin() {
        assert!(superadmin().require_superadmin().is_ok());
        assert!(owner(Uuid::new_v4()).require_superadmin().is_err());
    }

    #[test]
    fn test_unknown_role_in_claims_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: 0,
            iat: 0,
            jti: String::new(),
            token_type: shared::jwt::TokenType::Access,
            role: "root".to_string(),
            store_id: None,
        };
        assert!(matches!(
            AdminAuth::from_claims(&claims),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
