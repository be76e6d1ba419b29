//! HTTP handlers for the exposition endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use nexus_metrics::{CONTENT_TYPE, render_prometheus};

use crate::ExporterState;

const LANDING: &str = "Nexus exporter\n\nMetrics are served at /metrics\n";

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ExporterState>) -> Response {
    match state.collector.collect().await {
        Ok(samples) => (
            StatusCode::OK,
            [("content-type", CONTENT_TYPE)],
            render_prometheus(&samples),
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            [("content-type", "text/plain; charset=utf-8")],
            format!("collection failed: {e}\n"),
        )
            .into_response(),
    }
}

/// GET /
pub async fn landing() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        LANDING,
    )
}
