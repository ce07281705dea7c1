//! Payment provider client.
//!
//! The provider is the authority on charge status. It is abstracted
//! behind a trait so the reconciler and the background job can be
//! exercised with a scripted provider in tests; the production
//! implementation talks HTTP with a per-call timeout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::PaymentConfig;

/// Errors that can occur talking to the payment provider.
///
/// All variants are treated as transient by callers: no ledger state is
/// changed and the operation may be retried.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),
}

/// Charge status as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderChargeStatus {
    Pending,
    Succeeded,
    Failed,
    Expired,
}

/// A charge as seen by the provider.
#[derive(Debug, Clone)]
pub struct ProviderCharge {
    pub provider_ref: String,
    pub status: ProviderChargeStatus,
    /// Settlement time reported by the provider, when succeeded.
    pub paid_at: Option<DateTime<Utc>>,
    /// Scannable QR payload; present on charge creation.
    pub qr_payload: Option<String>,
}

/// Interface to the payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a charge for the given amount and return its reference
    /// plus the QR payload the customer scans.
    async fn create_charge(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<ProviderCharge, ProviderError>;

    /// Query the authoritative status of an existing charge.
    async fn charge_status(&self, provider_ref: &str) -> Result<ProviderCharge, ProviderError>;

    /// Cancel a charge that will never be paid, e.g. when recording the
    /// checkout failed after the charge was created.
    async fn cancel_charge(&self, provider_ref: &str) -> Result<(), ProviderError>;
}

#[derive(Debug, Serialize)]
struct CreateChargeBody<'a> {
    amount: i64,
    currency: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChargeBody {
    id: String,
    status: ProviderChargeStatus,
    #[serde(default)]
    paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    qr_payload: Option<String>,
}

impl From<ChargeBody> for ProviderCharge {
    fn from(body: ChargeBody) -> Self {
        Self {
            provider_ref: body.id,
            status: body.status,
            paid_at: body.paid_at,
            qr_payload: body.qr_payload,
        }
    }
}

/// HTTP client for the payment provider API.
pub struct HttpPaymentProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpPaymentProvider {
    /// Build a client from payment configuration.
    pub fn new(config: &PaymentConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn create_charge(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<ProviderCharge, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/charges", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CreateChargeBody { amount, currency })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let body: ChargeBody = response.json().await?;
        if body.qr_payload.is_none() {
            return Err(ProviderError::InvalidResponse(
                "charge created without qr_payload".to_string(),
            ));
        }
        Ok(body.into())
    }

    async fn charge_status(&self, provider_ref: &str) -> Result<ProviderCharge, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1/charges/{}", self.base_url, provider_ref))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let body: ChargeBody = response.json().await?;
        Ok(body.into())
    }

    async fn cancel_charge(&self, provider_ref: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/charges/{}/cancel", self.base_url, provider_ref))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}
