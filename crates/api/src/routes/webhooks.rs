//! Inbound payment provider webhook.
//!
//! The signature is an HMAC-SHA256 of the raw request body, so the body
//! must be verified before any JSON parsing. Duplicate and replayed
//! deliveries are harmless: the reported status goes through the same
//! guarded transition as every other reconciliation path.

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_webhook_delivery;
use crate::services::payment_provider::ProviderChargeStatus;
use crate::services::ReconcileError;

/// Header carrying the hex-encoded HMAC of the raw body.
pub const SIGNATURE_HEADER: &str = "X-Signature";

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    provider_ref: String,
    status: ProviderChargeStatus,
    #[serde(default)]
    paid_at: Option<DateTime<Utc>>,
}

/// POST /api/v1/webhooks/payment
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            record_webhook_delivery(false);
            ApiError::Unauthorized("Missing webhook signature".into())
        })?;

    if !shared::crypto::verify_hmac_sha256(&state.config.payment.webhook_secret, &body, signature)
    {
        record_webhook_delivery(false);
        tracing::warn!("Webhook rejected: bad signature");
        return Err(ApiError::Unauthorized("Invalid webhook signature".into()));
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        record_webhook_delivery(false);
        ApiError::Validation(format!("Malformed webhook payload: {}", e))
    })?;

    let result = state
        .reconciler
        .apply_webhook(&payload.provider_ref, payload.status, payload.paid_at)
        .await
        .map_err(|e| {
            if !matches!(e, ReconcileError::NotFound) {
                record_webhook_delivery(false);
            }
            ApiError::from(e)
        })?;

    record_webhook_delivery(true);
    tracing::info!(
        provider_ref = %payload.provider_ref,
        status = %result.status,
        already_paid = result.is_already_paid,
        "Webhook processed"
    );

    Ok(Json(json!({
        "received": true,
        "status": result.status,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_deserialization() {
        let body = r#"{
            "provider_ref": "chg_abc123",
            "status": "succeeded",
            "paid_at": "2025-06-01T20:00:00Z"
        }"#;
        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.provider_ref, "chg_abc123");
        assert_eq!(payload.status, ProviderChargeStatus::Succeeded);
        assert!(payload.paid_at.is_some());
    }

    #[test]
    fn test_payload_without_paid_at() {
        let body = r#"{"provider_ref": "chg_x", "status": "failed"}"#;
        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.status, ProviderChargeStatus::Failed);
        assert!(payload.paid_at.is_none());
    }

    #[test]
    fn test_signature_verification_matches_sender() {
        // The sender signs the exact raw body bytes
        let secret = "whsec_test";
        let body = br#"{"provider_ref":"chg_x","status":"succeeded"}"#;
        let signature = shared::crypto::sign_hmac_sha256(secret, body);

        assert!(shared::crypto::verify_hmac_sha256(secret, body, &signature));
        // Any body mutation invalidates the signature
        let tampered = br#"{"provider_ref":"chg_y","status":"succeeded"}"#;
        assert!(!shared::crypto::verify_hmac_sha256(
            secret, tampered, &signature
        ));
    }
}
