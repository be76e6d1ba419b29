//! nexus-exporter — Prometheus exporter for Sonatype Nexus.
//!
//! # Usage
//!
//! ```text
//! nexus-exporter --host http://localhost:8081 -u admin -p admin123
//! NEXUS_HOST=http://nexus:8081 NEXUS_ADMIN_PASSWORD=... nexus-exporter
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nexus_exporter::{Collector, ExporterArgs, FailurePolicy, LogFormat, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Invalid values exit with status 2 before anything is bound.
    let args = ExporterArgs::parse();

    // Initialize tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nexus_exporter=debug"));
    match args.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }

    let client = args
        .build_client()
        .context("invalid upstream configuration")?;

    info!(
        upstream = %args.host,
        user = %args.user,
        timeout_secs = args.upstream_timeout,
        "nexus exporter starting"
    );

    let collector = Arc::new(Collector::new(client, FailurePolicy::Terminate));
    let router = build_router(collector);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!(addr = %listener.local_addr()?, "serving metrics at /metrics");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("nexus exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
