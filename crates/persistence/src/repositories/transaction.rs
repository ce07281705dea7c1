//! Transaction repository for database operations.
//!
//! The terminal transition is a conditional update keyed on the current
//! status, so concurrent reconcilers (webhook delivery, client polls,
//! the background job) cannot move a transaction out of pending twice.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{PaidWarpRow, RevenueSummaryRow, TransactionEntity, TransactionStatusDb};
use crate::metrics::QueryTimer;

const TRANSACTION_COLUMNS: &str = "id, store_id, code, customer_name, amount, currency, status, \
     provider_ref, paid_at, expires_at, created_at, updated_at";

/// Song request details attached to a checkout.
#[derive(Debug, Clone, Copy)]
pub struct NewSongRequest<'a> {
    pub title: &'a str,
    pub artist: Option<&'a str>,
    pub message: Option<&'a str>,
}

/// Repository for transaction database operations.
#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending transaction at checkout initiation, together
    /// with its optional song request.
    ///
    /// Both inserts run in one database transaction: a checkout never
    /// leaves a song request without a ledger row or vice versa. The
    /// song request's display window stays unset until the transaction
    /// is paid.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pending(
        &self,
        store_id: Uuid,
        code: &str,
        customer_name: &str,
        amount: i64,
        currency: &str,
        provider_ref: &str,
        expires_at: DateTime<Utc>,
        song_request: Option<NewSongRequest<'_>>,
    ) -> Result<TransactionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_pending_transaction");
        let mut tx = self.pool.begin().await?;

        let transaction = sqlx::query_as::<_, TransactionEntity>(&format!(
            r#"
            INSERT INTO transactions (store_id, code, customer_name, amount, currency, provider_ref, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TRANSACTION_COLUMNS}
            "#,
        ))
        .bind(store_id)
        .bind(code)
        .bind(customer_name)
        .bind(amount)
        .bind(currency)
        .bind(provider_ref)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(song) = song_request {
            sqlx::query(
                r#"
                INSERT INTO song_requests (transaction_id, store_id, title, artist, message)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(transaction.id)
            .bind(store_id)
            .bind(song.title)
            .bind(song.artist)
            .bind(song.message)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(transaction)
    }

    /// Find a transaction by ID within a store.
    pub async fn find_by_id_for_store(
        &self,
        id: Uuid,
        store_id: Uuid,
    ) -> Result<Option<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_transaction_by_id");
        let result = sqlx::query_as::<_, TransactionEntity>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE id = $1 AND store_id = $2
            "#,
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a transaction by its provider charge reference.
    pub async fn find_by_provider_ref(
        &self,
        provider_ref: &str,
    ) -> Result<Option<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_transaction_by_provider_ref");
        let result = sqlx::query_as::<_, TransactionEntity>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE provider_ref = $1
            "#,
        ))
        .bind(provider_ref)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Move a transaction out of pending into a terminal status.
    ///
    /// The update is guarded on `status = 'pending'`: the caller that wins
    /// the race gets `Some(row)` back; every other concurrent attempt gets
    /// `None` and must re-read the winner's result. When the terminal
    /// status is paid, the linked song request's display window is opened
    /// in the same database transaction so the side effect cannot be
    /// applied without the transition (or twice).
    pub async fn mark_terminal(
        &self,
        id: Uuid,
        status: TransactionStatusDb,
        paid_at: Option<DateTime<Utc>>,
        display_window_secs: i64,
    ) -> Result<Option<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_transaction_terminal");
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, TransactionEntity>(&format!(
            r#"
            UPDATE transactions
            SET status = $2, paid_at = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {TRANSACTION_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(status)
        .bind(paid_at)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(ref transaction) = updated {
            if transaction.status == TransactionStatusDb::Paid {
                let window_start = transaction.paid_at.unwrap_or_else(Utc::now);
                sqlx::query(
                    r#"
                    UPDATE song_requests
                    SET display_from = $2,
                        display_until = $2 + make_interval(secs => $3::float8)
                    WHERE transaction_id = $1
                    "#,
                )
                .bind(id)
                .bind(window_start)
                .bind(display_window_secs as f64)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        timer.record();
        Ok(updated)
    }

    /// Fetch pending transactions older than the given age, oldest first.
    /// Used by the background polling job; bounded by `limit`.
    pub async fn find_stale_pending(
        &self,
        min_age_secs: i64,
        limit: i64,
    ) -> Result<Vec<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_stale_pending_transactions");
        let result = sqlx::query_as::<_, TransactionEntity>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE status = 'pending' AND created_at < NOW() - make_interval(secs => $1::float8)
            ORDER BY created_at
            LIMIT $2
            "#,
        ))
        .bind(min_age_secs as f64)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Expire pending transactions past their deadline.
    /// Returns the number of expired records.
    pub async fn expire_overdue(&self) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("expire_overdue_transactions");
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = 'expired', updated_at = NOW()
            WHERE status = 'pending' AND expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected());
        timer.record();
        result
    }

    /// List transactions for a store, newest first, optionally filtered
    /// by status.
    pub async fn list_for_store(
        &self,
        store_id: Uuid,
        status_filter: Option<TransactionStatusDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_transactions_for_store");
        let result = if let Some(status) = status_filter {
            sqlx::query_as::<_, TransactionEntity>(&format!(
                r#"
                SELECT {TRANSACTION_COLUMNS}
                FROM transactions
                WHERE store_id = $1 AND status = $2
                ORDER BY created_at DESC
                LIMIT $3 OFFSET $4
                "#,
            ))
            .bind(store_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, TransactionEntity>(&format!(
                r#"
                SELECT {TRANSACTION_COLUMNS}
                FROM transactions
                WHERE store_id = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            ))
            .bind(store_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        };
        timer.record();
        result
    }

    /// Count transactions for a store, optionally filtered by status.
    pub async fn count_for_store(
        &self,
        store_id: Uuid,
        status_filter: Option<TransactionStatusDb>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_transactions_for_store");
        let result = if let Some(status) = status_filter {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM transactions WHERE store_id = $1 AND status = $2",
            )
            .bind(store_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await
        } else {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE store_id = $1")
                .bind(store_id)
                .fetch_one(&self.pool)
                .await
        };
        timer.record();
        result
    }

    /// Fetch all paid warps for a store, feeding the leaderboard and
    /// activity aggregators.
    pub async fn paid_for_store(&self, store_id: Uuid) -> Result<Vec<PaidWarpRow>, sqlx::Error> {
        let timer = QueryTimer::new("paid_transactions_for_store");
        let result = sqlx::query_as::<_, PaidWarpRow>(
            r#"
            SELECT customer_name, code, amount, paid_at
            FROM transactions
            WHERE store_id = $1 AND status = 'paid' AND paid_at IS NOT NULL
            ORDER BY paid_at
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Revenue summary for the admin dashboard.
    pub async fn revenue_summary(&self, store_id: Uuid) -> Result<RevenueSummaryRow, sqlx::Error> {
        let timer = QueryTimer::new("revenue_summary");
        let result = sqlx::query_as::<_, RevenueSummaryRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'paid') AS paid_count,
                COALESCE(SUM(amount) FILTER (WHERE status = 'paid'), 0)::bigint AS total_amount,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_count
            FROM transactions
            WHERE store_id = $1
            "#,
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
