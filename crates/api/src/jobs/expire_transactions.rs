//! Background job that expires overdue pending transactions.

use persistence::repositories::TransactionRepository;
use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::record_transactions_settled;

pub struct ExpireTransactionsJob {
    transactions: TransactionRepository,
}

impl ExpireTransactionsJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            transactions: TransactionRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Job for ExpireTransactionsJob {
    fn name(&self) -> &'static str {
        "expire_overdue_transactions"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        let expired = self
            .transactions
            .expire_overdue()
            .await
            .map_err(|e| format!("Failed to expire overdue transactions: {}", e))?;

        if expired > 0 {
            record_transactions_settled("expired", "expiry", expired);
            tracing::info!(expired = expired, "Expired overdue transactions");
        }
        Ok(())
    }
}
