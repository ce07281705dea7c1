//! Transaction entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{PaidWarp, Transaction, TransactionStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
pub enum TransactionStatusDb {
    Pending,
    Paid,
    Failed,
    Expired,
}

impl TransactionStatusDb {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatusDb::Pending)
    }
}

impl From<TransactionStatus> for TransactionStatusDb {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Pending => TransactionStatusDb::Pending,
            TransactionStatus::Paid => TransactionStatusDb::Paid,
            TransactionStatus::Failed => TransactionStatusDb::Failed,
            TransactionStatus::Expired => TransactionStatusDb::Expired,
        }
    }
}

impl From<TransactionStatusDb> for TransactionStatus {
    fn from(status: TransactionStatusDb) -> Self {
        match status {
            TransactionStatusDb::Pending => TransactionStatus::Pending,
            TransactionStatusDb::Paid => TransactionStatus::Paid,
            TransactionStatusDb::Failed => TransactionStatus::Failed,
            TransactionStatusDb::Expired => TransactionStatus::Expired,
        }
    }
}

/// Database row mapping for the transactions table.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionEntity {
    pub id: Uuid,
    pub store_id: Uuid,
    pub code: String,
    pub customer_name: String,
    pub amount: i64,
    pub currency: String,
    pub status: TransactionStatusDb,
    pub provider_ref: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TransactionEntity> for Transaction {
    fn from(e: TransactionEntity) -> Self {
        Self {
            id: e.id,
            store_id: e.store_id,
            code: e.code,
            customer_name: e.customer_name,
            amount: e.amount,
            currency: e.currency,
            status: e.status.into(),
            provider_ref: e.provider_ref,
            paid_at: e.paid_at,
            expires_at: e.expires_at,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Projection of a paid transaction for leaderboard aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct PaidWarpRow {
    pub customer_name: String,
    pub code: String,
    pub amount: i64,
    pub paid_at: DateTime<Utc>,
}

impl From<PaidWarpRow> for PaidWarp {
    fn from(r: PaidWarpRow) -> Self {
        Self {
            customer_name: r.customer_name,
            code: r.code,
            amount: r.amount,
            paid_at: r.paid_at,
        }
    }
}

/// Revenue summary projection for the admin dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct RevenueSummaryRow {
    pub paid_count: i64,
    pub total_amount: i64,
    pub pending_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_roundtrip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Paid,
            TransactionStatus::Failed,
            TransactionStatus::Expired,
        ] {
            let db: TransactionStatusDb = status.into();
            let back: TransactionStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_db_terminal_matches_domain() {
        assert!(!TransactionStatusDb::Pending.is_terminal());
        assert!(TransactionStatusDb::Paid.is_terminal());
        assert!(TransactionStatusDb::Failed.is_terminal());
        assert!(TransactionStatusDb::Expired.is_terminal());
    }
}
