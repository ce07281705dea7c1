//! Warp profile endpoints.
//!
//! Admins manage profiles within their store scope; the public lookup
//! resolves an active profile by code for the checkout page.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::{CreateWarpProfileRequest, UpdateWarpProfileRequest, WarpProfileResponse};
use persistence::repositories::WarpProfileRepository;
use serde::{Deserialize, Serialize};
use shared::pagination::{PageInfo, PageQuery};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::StoreContext;
use crate::middleware::AdminAuth;

#[derive(Debug, Deserialize)]
pub struct ProfileListQuery {
    pub store_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StoreScopeQuery {
    pub store_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<WarpProfileResponse>,
    pub page: PageInfo,
}

fn to_response(entity: persistence::entities::WarpProfileEntity) -> WarpProfileResponse {
    domain::models::WarpProfile::from(entity).into()
}

/// GET /api/v1/public/profiles/:code
pub async fn get_public_profile(
    State(state): State<AppState>,
    store: StoreContext,
    Path(code): Path<String>,
) -> Result<Json<WarpProfileResponse>, ApiError> {
    let profile = WarpProfileRepository::new(state.pool.clone())
        .find_active_by_code(store.store.id, &code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    Ok(Json(to_response(profile)))
}

/// POST /api/v1/admin/profiles
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Query(scope): Query<StoreScopeQuery>,
    Json(request): Json<CreateWarpProfileRequest>,
) -> Result<(StatusCode, Json<WarpProfileResponse>), ApiError> {
    let store_id = auth.store_scope(scope.store_id)?;
    request.validate()?;

    let profile = WarpProfileRepository::new(state.pool.clone())
        .create(
            store_id,
            &request.code,
            &request.name,
            request.social_link.as_deref(),
            request.is_active,
        )
        .await?;

    tracing::info!(store_id = %store_id, code = %profile.code, "Warp profile created");
    Ok((StatusCode::CREATED, Json(to_response(profile))))
}

/// GET /api/v1/admin/profiles
pub async fn list_profiles(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Query(query): Query<ProfileListQuery>,
) -> Result<Json<ProfileListResponse>, ApiError> {
    let store_id = auth.store_scope(query.store_id)?;
    let page = PageQuery {
        limit: query.limit,
        offset: query.offset,
    };

    let repo = WarpProfileRepository::new(state.pool.clone());
    let profiles = repo
        .list_for_store(store_id, page.limit(), page.offset())
        .await?;
    let total = repo.count_for_store(store_id).await?;

    Ok(Json(ProfileListResponse {
        profiles: profiles.into_iter().map(to_response).collect(),
        page: PageInfo::new(&page, total),
    }))
}

/// GET /api/v1/admin/profiles/:profile_id
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Query(scope): Query<StoreScopeQuery>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<WarpProfileResponse>, ApiError> {
    let store_id = auth.store_scope(scope.store_id)?;

    let profile = WarpProfileRepository::new(state.pool.clone())
        .find_by_id_for_store(profile_id, store_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    Ok(Json(to_response(profile)))
}

/// PATCH /api/v1/admin/profiles/:profile_id
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Query(scope): Query<StoreScopeQuery>,
    Path(profile_id): Path<Uuid>,
    Json(request): Json<UpdateWarpProfileRequest>,
) -> Result<Json<WarpProfileResponse>, ApiError> {
    let store_id = auth.store_scope(scope.store_id)?;
    request.validate()?;

    let profile = WarpProfileRepository::new(state.pool.clone())
        .update(
            profile_id,
            store_id,
            request.name.as_deref(),
            request.social_link.as_deref(),
            request.is_active,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    Ok(Json(to_response(profile)))
}
