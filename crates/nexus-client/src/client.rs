//! Authenticated fetch of the two upstream documents.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, HOST, USER_AGENT};
use http::{HeaderValue, Method, Request, StatusCode};
use http_body_util::{BodyExt, Empty};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::{Target, UpstreamCredential};
use crate::error::{ConfigError, FetchError};
use crate::raw::{RawMetricsData, RawSystemInfo};

/// The two upstream endpoints a collection cycle reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SystemInformation,
    MetricsData,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::SystemInformation => "/service/rest/atlas/system-information",
            Self::MetricsData => "/service/metrics/data",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SystemInformation => "system-information",
            Self::MetricsData => "metrics-data",
        })
    }
}

/// Client for one monitored instance.
///
/// Immutable after construction and cheap to share; the authorization
/// header is built once here rather than per request.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    target: Target,
    authorization: HeaderValue,
    timeout: Duration,
}

impl UpstreamClient {
    /// Per-request timeout used unless overridden.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(target: Target, credential: &UpstreamCredential) -> Result<Self, ConfigError> {
        Ok(Self {
            target,
            authorization: credential.authorization()?,
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-request timeout. A timed-out request is reported
    /// as [`FetchError::Unreachable`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch both documents for one collection cycle.
    ///
    /// The requests run concurrently. When both fail, the
    /// system-information error is the one returned.
    pub async fn fetch(&self) -> Result<(RawSystemInfo, RawMetricsData), FetchError> {
        let (info, data) = tokio::join!(
            self.get_json(Endpoint::SystemInformation),
            self.get_json(Endpoint::MetricsData),
        );
        Ok((RawSystemInfo(info?), RawMetricsData(data?)))
    }

    async fn get_json(&self, endpoint: Endpoint) -> Result<Value, FetchError> {
        let body = self.get(endpoint).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::MalformedResponse {
            endpoint,
            reason: e.to_string(),
        })
    }

    async fn get(&self, endpoint: Endpoint) -> Result<Bytes, FetchError> {
        match tokio::time::timeout(self.timeout, self.send(endpoint)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(%endpoint, timeout = ?self.timeout, "upstream request timed out");
                Err(FetchError::unreachable(
                    endpoint,
                    format!("timed out after {:?}", self.timeout),
                ))
            }
        }
    }

    /// One GET over a dedicated connection.
    async fn send(&self, endpoint: Endpoint) -> Result<Bytes, FetchError> {
        let addr = self.target.socket_addr();
        let url = self.target.endpoint_url(endpoint);

        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| FetchError::unreachable(endpoint, format!("connect to {addr}: {e}")))?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| FetchError::unreachable(endpoint, format!("handshake with {addr}: {e}")))?;

        // Drive the connection in the background. The guard aborts the
        // task, closing the socket, when this future completes or is dropped.
        let _conn = AbortOnDrop(tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(error = %e, "upstream connection closed with error");
            }
        }));

        let req = Request::builder()
            .method(Method::GET)
            .uri(self.target.request_path(endpoint))
            .header(HOST, self.target.authority().as_str())
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("nexus-exporter/", env!("CARGO_PKG_VERSION")))
            .body(Empty::<Bytes>::new())
            .map_err(|e| FetchError::unreachable(endpoint, e))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| FetchError::unreachable(endpoint, format!("GET {url}: {e}")))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized { endpoint });
        }
        if !status.is_success() {
            return Err(FetchError::unreachable(
                endpoint,
                format!("GET {url} returned {status}"),
            ));
        }

        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| FetchError::unreachable(endpoint, format!("reading body of {url}: {e}")))?
            .to_bytes();

        debug!(%endpoint, bytes = body.len(), "upstream response received");
        Ok(body)
    }
}

/// Aborts a spawned task when dropped.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
