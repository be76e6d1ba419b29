//! nexus-exporter — Prometheus exporter for Sonatype Nexus.
//!
//! Every scrape of `/metrics` runs exactly one collection cycle: both
//! upstream documents are fetched, mapped to samples and rendered. Nothing
//! is cached between scrapes, and a failed cycle never serves a partial
//! sample set.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition, one fresh cycle per request |
//! | GET | `/` | Landing page |
//!
//! # Failure policy
//!
//! With [`FailurePolicy::Terminate`] (the binary's policy) any fetch or
//! mapping failure logs a diagnostic and exits the process with status 1.
//! Wrong credentials, a wrong target or an incompatible upstream version
//! are left to the supervisor to restart, never retried in-process.

pub mod collector;
pub mod config;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

pub use collector::{CollectError, Collector, FailurePolicy};
pub use config::{ExporterArgs, LogFormat};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct ExporterState {
    pub collector: Arc<Collector>,
}

/// Build the exporter router.
pub fn build_router(collector: Arc<Collector>) -> Router {
    Router::new()
        .route("/metrics", get(handlers::prometheus_metrics))
        .route("/", get(handlers::landing))
        .with_state(ExporterState { collector })
}
