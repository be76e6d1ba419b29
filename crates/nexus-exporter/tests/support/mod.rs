//! Loopback stand-in for the Nexus admin API.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use nexus_client::{Target, UpstreamClient, UpstreamCredential};
use nexus_exporter::{Collector, FailurePolicy};

pub const INFO_PATH: &str = "/service/rest/atlas/system-information";
pub const DATA_PATH: &str = "/service/metrics/data";

pub const SYSTEM_INFORMATION: &str =
    include_str!("../../../nexus-metrics/tests/fixtures/system-information.json");
pub const METRICS_DATA: &str =
    include_str!("../../../nexus-metrics/tests/fixtures/metrics-data.json");

const AUTHORIZATION: &str = "Basic YWRtaW46YWRtaW4xMjM=";

/// Request counters per endpoint.
#[derive(Clone, Default)]
pub struct Hits {
    pub info: Arc<AtomicUsize>,
    pub data: Arc<AtomicUsize>,
}

impl Hits {
    pub fn info(&self) -> usize {
        self.info.load(Ordering::SeqCst)
    }

    pub fn data(&self) -> usize {
        self.data.load(Ordering::SeqCst)
    }
}

fn json_response(headers: &HeaderMap, body: &'static str) -> Response {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(AUTHORIZATION) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (StatusCode::OK, [("content-type", "application/json")], body).into_response()
}

async fn info(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    hits.info.fetch_add(1, Ordering::SeqCst);
    json_response(&headers, SYSTEM_INFORMATION)
}

async fn data(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    hits.data.fetch_add(1, Ordering::SeqCst);
    json_response(&headers, METRICS_DATA)
}

/// Upstream serving the fixtures to requests carrying admin/admin123.
pub fn healthy_upstream(hits: Hits) -> Router {
    Router::new()
        .route(INFO_PATH, get(info))
        .route(DATA_PATH, get(data))
        .with_state(hits)
}

/// Upstream that rejects every request with 401.
pub fn unauthorized_upstream() -> Router {
    Router::new()
        .route(INFO_PATH, get(|| async { StatusCode::UNAUTHORIZED }))
        .route(DATA_PATH, get(|| async { StatusCode::UNAUTHORIZED }))
}

/// Upstream whose system-information body is not JSON.
pub fn malformed_upstream() -> Router {
    Router::new()
        .route(INFO_PATH, get(|| async { "<html>Nexus is starting</html>" }))
        .route(
            DATA_PATH,
            get(|| async { ([("content-type", "application/json")], METRICS_DATA) }),
        )
}

pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

pub fn collector_for(upstream: SocketAddr, policy: FailurePolicy) -> Arc<Collector> {
    let target = Target::parse(&format!("http://{upstream}")).unwrap();
    let client =
        UpstreamClient::new(target, &UpstreamCredential::new("admin", "admin123")).unwrap();
    Arc::new(Collector::new(client, policy))
}
