//! Store tenancy extractor.
//!
//! Public endpoints resolve their tenant from the `X-Store-Slug`
//! header. An unknown or deactivated store is reported as not found so
//! the header does not leak which slugs exist.

use axum::{extract::FromRequestParts, http::request::Parts};
use domain::models::Store;
use persistence::repositories::StoreRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the tenant slug on public requests.
pub const STORE_SLUG_HEADER: &str = "X-Store-Slug";

/// The resolved tenant for a public request.
#[derive(Debug, Clone)]
pub struct StoreContext {
    pub store: Store,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for StoreContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let slug = parts
            .headers
            .get(STORE_SLUG_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Validation("Missing X-Store-Slug header".into()))?;

        let store = StoreRepository::new(state.pool.clone())
            .find_by_slug(slug)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| ApiError::NotFound("Store not found".into()))?;

        Ok(StoreContext {
            store: store.into(),
        })
    }
}
