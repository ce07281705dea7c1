//! Warp checkout orchestration.
//!
//! A checkout spans two systems: a charge at the payment provider and
//! a pending transaction (plus optional song request) in the ledger.
//! The ledger writes share one database transaction, and if they fail
//! after the charge exists, the charge is cancelled so a customer
//! cannot pay against a charge no ledger row will ever reconcile.

use chrono::{Duration, Utc};
use domain::models::{CreateWarpRequest, CreateWarpResponse, TransactionStatus};
use persistence::repositories::{NewSongRequest, TransactionRepository, WarpProfileRepository};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::metrics::record_warp_created;
use crate::services::payment_provider::{PaymentProvider, ProviderError};

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Unknown warp code")]
    UnknownCode,

    #[error("Charge created without QR payload")]
    MissingQrPayload,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::UnknownCode => ApiError::NotFound("Unknown warp code".into()),
            CheckoutError::MissingQrPayload => {
                ApiError::Provider("Charge created without QR payload".into())
            }
            CheckoutError::Provider(e) => ApiError::Provider(e.to_string()),
            CheckoutError::Database(e) => e.into(),
        }
    }
}

/// Creates checkouts: provider charge first, then the ledger rows.
#[derive(Clone)]
pub struct CheckoutService {
    profiles: WarpProfileRepository,
    transactions: TransactionRepository,
    provider: Arc<dyn PaymentProvider>,
    checkout_ttl_secs: i64,
}

impl CheckoutService {
    pub fn new(pool: PgPool, provider: Arc<dyn PaymentProvider>, checkout_ttl_secs: i64) -> Self {
        Self {
            profiles: WarpProfileRepository::new(pool.clone()),
            transactions: TransactionRepository::new(pool),
            provider,
            checkout_ttl_secs,
        }
    }

    /// Initiate a checkout for a store's warp profile. The caller has
    /// already validated the request payload.
    pub async fn create_warp(
        &self,
        store_id: Uuid,
        request: &CreateWarpRequest,
    ) -> Result<CreateWarpResponse, CheckoutError> {
        let profile = self
            .profiles
            .find_active_by_code(store_id, &request.code)
            .await?
            .ok_or(CheckoutError::UnknownCode)?;

        let charge = self
            .provider
            .create_charge(request.amount, &request.currency)
            .await?;

        let qr_payload = charge
            .qr_payload
            .clone()
            .ok_or(CheckoutError::MissingQrPayload)?;

        let expires_at = Utc::now() + Duration::seconds(self.checkout_ttl_secs);
        let song_request = request.song_request.as_ref().map(|s| NewSongRequest {
            title: &s.title,
            artist: s.artist.as_deref(),
            message: s.message.as_deref(),
        });

        let created = self
            .transactions
            .create_pending(
                store_id,
                &profile.code,
                &request.customer_name,
                request.amount,
                &request.currency,
                &charge.provider_ref,
                expires_at,
                song_request,
            )
            .await;

        let transaction = match created {
            Ok(transaction) => transaction,
            Err(e) => {
                // The charge exists at the provider but has no ledger
                // row; cancel it so it cannot be paid. Best effort: if
                // the cancel fails too, the charge stays payable and
                // its webhook will be rejected as unknown.
                if let Err(cancel_err) = self.provider.cancel_charge(&charge.provider_ref).await {
                    tracing::warn!(
                        provider_ref = %charge.provider_ref,
                        error = %cancel_err,
                        "Failed to cancel charge after checkout write failed"
                    );
                }
                return Err(e.into());
            }
        };

        record_warp_created();
        tracing::info!(
            transaction_id = %transaction.id,
            store_id = %store_id,
            code = %transaction.code,
            amount = transaction.amount,
            "Checkout initiated"
        );

        Ok(CreateWarpResponse {
            transaction_id: transaction.id,
            status: TransactionStatus::Pending,
            qr_payload,
            expires_at,
        })
    }
}
