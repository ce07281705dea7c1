//! Admin authentication endpoints.

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthService, LoginRequest, RefreshRequest, TokenResponse};

/// POST /api/v1/admin/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let tokens = service.login(&request).await?;
    Ok(Json(tokens))
}

/// POST /api/v1/admin/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let tokens = service.refresh(&request).await?;
    Ok(Json(tokens))
}
