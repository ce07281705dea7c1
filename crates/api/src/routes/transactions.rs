//! Warp checkout and transaction endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::{
    CheckStatusResponse, CreateWarpRequest, CreateWarpResponse, Transaction, TransactionResponse,
    TransactionStatus,
};
use persistence::repositories::TransactionRepository;
use serde::{Deserialize, Serialize};
use shared::pagination::{PageInfo, PageQuery};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::StoreContext;
use crate::middleware::AdminAuth;

/// POST /api/v1/public/warps
///
/// Initiates a checkout: creates a charge at the payment provider, a
/// pending transaction, and optionally the attached song request. The
/// QR payload is returned for the customer to scan; the transaction
/// settles later through reconciliation.
pub async fn create_warp(
    State(state): State<AppState>,
    store: StoreContext,
    Json(request): Json<CreateWarpRequest>,
) -> Result<(StatusCode, Json<CreateWarpResponse>), ApiError> {
    request.validate()?;

    let response = state.checkout.create_warp(store.store.id, &request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/public/transactions/:transaction_id/status
///
/// Client poll while the customer waits on the checkout page. Runs the
/// full reconciliation so a missed webhook still settles the payment.
pub async fn check_status(
    State(state): State<AppState>,
    store: StoreContext,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<CheckStatusResponse>, ApiError> {
    let result = state
        .reconciler
        .check_status(transaction_id, store.store.id)
        .await?;

    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub store_id: Option<Uuid>,
    pub status: Option<TransactionStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StoreScopeQuery {
    pub store_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
    pub page: PageInfo,
}

/// GET /api/v1/admin/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let store_id = auth.store_scope(query.store_id)?;
    let page = PageQuery {
        limit: query.limit,
        offset: query.offset,
    };
    let status_filter = query.status.map(Into::into);

    let repo = TransactionRepository::new(state.pool.clone());
    let transactions = repo
        .list_for_store(store_id, status_filter, page.limit(), page.offset())
        .await?;
    let total = repo.count_for_store(store_id, status_filter).await?;

    Ok(Json(TransactionListResponse {
        transactions: transactions
            .into_iter()
            .map(|t| Transaction::from(t).into())
            .collect(),
        page: PageInfo::new(&page, total),
    }))
}

/// POST /api/v1/admin/transactions/:transaction_id/check
///
/// Manual reconciliation trigger from the dashboard.
pub async fn admin_check_transaction(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Query(scope): Query<StoreScopeQuery>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<CheckStatusResponse>, ApiError> {
    let store_id = auth.store_scope(scope.store_id)?;

    let result = state.reconciler.check_status(transaction_id, store_id).await?;

    Ok(Json(result))
}

#[derive(Debug, Serialize)]
pub struct RevenueResponse {
    pub paid_count: i64,
    /// Sum of paid amounts in minor currency units.
    pub total_amount: i64,
    pub pending_count: i64,
}

/// GET /api/v1/admin/revenue
pub async fn revenue_summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Query(scope): Query<StoreScopeQuery>,
) -> Result<Json<RevenueResponse>, ApiError> {
    let store_id = auth.store_scope(scope.store_id)?;

    let summary = TransactionRepository::new(state.pool.clone())
        .revenue_summary(store_id)
        .await?;

    Ok(Json(RevenueResponse {
        paid_count: summary.paid_count,
        total_amount: summary.total_amount,
        pending_count: summary.pending_count,
    }))
}
