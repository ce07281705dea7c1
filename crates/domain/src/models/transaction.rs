//! Transaction domain model and checkout/status DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::song_request::SongRequestInput;

/// Lifecycle status of a transaction.
///
/// A transaction is created `Pending` and moves exactly once into one of
/// the terminal states. Terminal transactions are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Paid,
    Failed,
    Expired,
}

impl TransactionStatus {
    /// Whether this status is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A warp payment record.
///
/// `amount` is in minor currency units (satang for THB).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: Uuid,
    pub store_id: Uuid,
    /// Warp profile code the payment is directed at.
    pub code: String,
    pub customer_name: String,
    pub amount: i64,
    pub currency: String,
    pub status: TransactionStatus,
    /// Charge reference at the payment provider.
    pub provider_ref: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "THB".to_string()
}

/// Request payload for initiating a warp checkout.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateWarpRequest {
    #[validate(length(min = 1, max = 32, message = "Code must be 1-32 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub customer_name: String,

    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    #[serde(default = "default_currency")]
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,

    #[validate(nested)]
    pub song_request: Option<SongRequestInput>,
}

/// Response payload for a created checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateWarpResponse {
    pub transaction_id: Uuid,
    pub status: TransactionStatus,
    /// Scannable QR payload for the payment charge.
    pub qr_payload: String,
    pub expires_at: DateTime<Utc>,
}

/// Response payload for a single transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub code: String,
    pub customer_name: String,
    pub amount: i64,
    pub currency: String,
    pub status: TransactionStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            code: t.code,
            customer_name: t.customer_name,
            amount: t.amount,
            currency: t.currency,
            status: t.status,
            paid_at: t.paid_at,
            created_at: t.created_at,
        }
    }
}

/// Result of a status check against the reconciler.
///
/// `is_already_paid` distinguishes a check that found the transaction
/// already settled from the one that performed the transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckStatusResponse {
    pub status: TransactionStatus,
    pub is_already_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout_request(amount: i64) -> CreateWarpRequest {
        CreateWarpRequest {
            code: "DJ001".to_string(),
            customer_name: "Alice".to_string(),
            amount,
            currency: default_currency(),
            song_request: None,
        }
    }

    #[test]
    fn test_pending_is_not_terminal() {
        assert!(!TransactionStatus::Pending.is_terminal());
    }

    #[test]
    fn test_paid_failed_expired_are_terminal() {
        assert!(TransactionStatus::Paid.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
        assert!(TransactionStatus::Expired.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Paid).unwrap(),
            "\"paid\""
        );
        assert_eq!(TransactionStatus::Expired.to_string(), "expired");
    }

    #[test]
    fn test_checkout_request_valid() {
        assert!(checkout_request(1200).validate().is_ok());
    }

    #[test]
    fn test_checkout_request_zero_amount_rejected() {
        assert!(checkout_request(0).validate().is_err());
    }

    #[test]
    fn test_checkout_request_negative_amount_rejected() {
        assert!(checkout_request(-500).validate().is_err());
    }

    #[test]
    fn test_checkout_request_bad_currency_rejected() {
        let mut request = checkout_request(1200);
        request.currency = "BAHT".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_check_status_response_skips_missing_transaction() {
        let response = CheckStatusResponse {
            status: TransactionStatus::Pending,
            is_already_paid: false,
            transaction: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("transaction"));
        assert!(json.contains("\"status\":\"pending\""));
    }
}
