//! Background jobs.

pub mod expire_transactions;
pub mod pool_metrics;
pub mod reconcile_pending;
pub mod scheduler;

pub use expire_transactions::ExpireTransactionsJob;
pub use pool_metrics::PoolMetricsJob;
pub use reconcile_pending::ReconcilePendingJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
