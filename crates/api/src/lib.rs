//! meeWarp API server.
//!
//! Axum application wiring, route handlers, middleware, background jobs
//! and the payment reconciliation service.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod services;
