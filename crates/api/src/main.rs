use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use meewarp_api::app::create_app;
use meewarp_api::config::Config;
use meewarp_api::jobs::{
    ExpireTransactionsJob, JobScheduler, PoolMetricsJob, ReconcilePendingJob,
};
use meewarp_api::middleware::{init_metrics, logging};
use meewarp_api::services::{
    bootstrap, HttpPaymentProvider, PaymentProvider, ReconciliationService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    logging::init_logging(&config.logging);

    info!("Starting meeWarp API v{}", env!("CARGO_PKG_VERSION"));

    init_metrics();

    let pool = config.database.pool_settings().connect().await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    bootstrap::ensure_superadmin(&pool).await?;

    let provider: Arc<dyn PaymentProvider> = Arc::new(HttpPaymentProvider::new(&config.payment)?);
    let reconciler = ReconciliationService::new(
        pool.clone(),
        provider.clone(),
        config.payment.display_window_secs,
    );

    let mut scheduler = JobScheduler::new();
    scheduler.register(ReconcilePendingJob::new(
        pool.clone(),
        reconciler.clone(),
        config.payment.poll_interval_secs,
        config.payment.poll_min_age_secs,
        config.payment.poll_batch_size,
    ));
    scheduler.register(ExpireTransactionsJob::new(pool.clone()));
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    scheduler.start();

    let addr = config.socket_addr()?;
    let app = create_app(config, pool, provider, reconciler)?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, shutting down background jobs");
    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    } else {
        info!("Shutdown signal received");
    }
}
