//! Song request repository for database operations.
//!
//! Song requests are created by the transaction repository alongside
//! their ledger row; this repository covers the read side.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SongRequestEntity;
use crate::metrics::QueryTimer;

/// Repository for song request database operations.
#[derive(Clone)]
pub struct SongRequestRepository {
    pool: PgPool,
}

impl SongRequestRepository {
    /// Creates a new SongRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List song requests currently inside their display window,
    /// restricted to paid transactions.
    pub async fn visible_for_store(
        &self,
        store_id: Uuid,
    ) -> Result<Vec<SongRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("visible_song_requests");
        let result = sqlx::query_as::<_, SongRequestEntity>(
            r#"
            SELECT sr.id, sr.transaction_id, sr.store_id, sr.title, sr.artist, sr.message,
                   sr.display_from, sr.display_until, sr.created_at
            FROM song_requests sr
            JOIN transactions t ON t.id = sr.transaction_id
            WHERE sr.store_id = $1
              AND t.status = 'paid'
              AND sr.display_from <= NOW()
              AND sr.display_until >= NOW()
            ORDER BY sr.display_from
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
