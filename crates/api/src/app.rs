use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, trace_id,
    RateLimiterState,
};
use crate::routes::{
    auth, health, leaderboard, song_requests, stores, transactions, warp_profiles, webhooks,
};
use crate::services::{CheckoutService, PaymentProvider, ReconciliationService};
use shared::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub jwt: Arc<JwtConfig>,
    pub checkout: CheckoutService,
    pub reconciler: ReconciliationService,
}

pub fn create_app(
    config: Config,
    pool: PgPool,
    provider: Arc<dyn PaymentProvider>,
    reconciler: ReconciliationService,
) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    let jwt = Arc::new(JwtConfig::with_leeway(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.leeway_secs,
    )?);

    // Rate limiting is disabled when the limit is configured as 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let checkout = CheckoutService::new(pool.clone(), provider, config.payment.checkout_ttl_secs);

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
        jwt,
        checkout,
        reconciler,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public store-scoped routes (X-Store-Slug header), rate limited
    let public_routes = Router::new()
        .route("/api/v1/public/warps", post(transactions::create_warp))
        .route(
            "/api/v1/public/transactions/:transaction_id/status",
            get(transactions::check_status),
        )
        .route(
            "/api/v1/public/profiles/:code",
            get(warp_profiles::get_public_profile),
        )
        .route("/api/v1/public/leaderboard", get(leaderboard::get_leaderboard))
        .route("/api/v1/public/activity", get(leaderboard::get_activity))
        .route(
            "/api/v1/public/song-requests",
            get(song_requests::visible_song_requests),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Webhook route: authenticated by signature, not by admin token
    let webhook_routes = Router::new().route(
        "/api/v1/webhooks/payment",
        post(webhooks::payment_webhook),
    );

    // Login and refresh issue the tokens the admin routes require
    let auth_routes = Router::new()
        .route("/api/v1/admin/auth/login", post(auth::login))
        .route("/api/v1/admin/auth/refresh", post(auth::refresh));

    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/stores",
            post(stores::create_store).get(stores::list_stores),
        )
        .route("/api/v1/admin/stores/:store_id", get(stores::get_store))
        .route(
            "/api/v1/admin/profiles",
            post(warp_profiles::create_profile).get(warp_profiles::list_profiles),
        )
        .route(
            "/api/v1/admin/profiles/:profile_id",
            get(warp_profiles::get_profile).patch(warp_profiles::update_profile),
        )
        .route(
            "/api/v1/admin/transactions",
            get(transactions::list_transactions),
        )
        .route(
            "/api/v1/admin/transactions/:transaction_id/check",
            post(transactions::admin_check_transaction),
        )
        .route("/api/v1/admin/revenue", get(transactions::revenue_summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let infra_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(infra_routes)
        .merge(public_routes)
        .merge(webhook_routes)
        .merge(auth_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state))
}
