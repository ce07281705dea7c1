//! Store management endpoints (superadmin only).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::{CreateStoreRequest, StoreResponse};
use persistence::repositories::StoreRepository;
use serde::Serialize;
use shared::pagination::{PageInfo, PageQuery};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AdminAuth;

#[derive(Debug, Serialize)]
pub struct StoreListResponse {
    pub stores: Vec<StoreResponse>,
    pub page: PageInfo,
}

/// POST /api/v1/admin/stores
pub async fn create_store(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Json(request): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<StoreResponse>), ApiError> {
    auth.require_superadmin()?;
    request.validate()?;

    let store = StoreRepository::new(state.pool.clone())
        .create(&request.slug, &request.name, &request.timezone)
        .await?;

    tracing::info!(store_id = %store.id, slug = %store.slug, "Store created");
    Ok((
        StatusCode::CREATED,
        Json(domain::models::Store::from(store).into()),
    ))
}

/// GET /api/v1/admin/stores
pub async fn list_stores(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Query(page): Query<PageQuery>,
) -> Result<Json<StoreListResponse>, ApiError> {
    auth.require_superadmin()?;

    let repo = StoreRepository::new(state.pool.clone());
    let stores = repo.list(page.limit(), page.offset()).await?;
    let total = repo.count().await?;

    Ok(Json(StoreListResponse {
        stores: stores
            .into_iter()
            .map(|s| domain::models::Store::from(s).into())
            .collect(),
        page: PageInfo::new(&page, total),
    }))
}

/// GET /api/v1/admin/stores/:store_id
pub async fn get_store(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(store_id): Path<Uuid>,
) -> Result<Json<StoreResponse>, ApiError> {
    auth.require_superadmin()?;

    let store = StoreRepository::new(state.pool.clone())
        .find_by_id(store_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Store not found".into()))?;

    Ok(Json(domain::models::Store::from(store).into()))
}
