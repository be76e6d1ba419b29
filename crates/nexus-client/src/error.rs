//! Error types for configuration and upstream fetches.

use thiserror::Error;

use crate::client::Endpoint;

/// Invalid startup configuration. Always fatal before the listener binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid target URL `{input}`: {reason}")]
    InvalidUri { input: String, reason: String },

    #[error("target URL `{0}` has no scheme (expected e.g. http://localhost:8081)")]
    MissingScheme(String),

    #[error("target URL `{0}` has no host (expected e.g. http://localhost:8081)")]
    MissingHost(String),

    #[error("target URL must not embed credentials; pass them with --user/--password")]
    EmbeddedCredentials,

    #[error("unsupported target scheme `{0}`: only http is supported")]
    UnsupportedScheme(String),

    #[error("credential cannot be encoded as an authorization header")]
    InvalidCredential,
}

/// Failure of one upstream fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("authentication failure: {endpoint} endpoint answered HTTP 401")]
    Unauthorized { endpoint: Endpoint },

    #[error("{endpoint} endpoint unreachable: {reason}")]
    Unreachable { endpoint: Endpoint, reason: String },

    #[error("{endpoint} endpoint returned a malformed body: {reason}")]
    MalformedResponse { endpoint: Endpoint, reason: String },
}

impl FetchError {
    /// The endpoint whose request failed.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Unauthorized { endpoint }
            | Self::Unreachable { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. } => *endpoint,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub(crate) fn unreachable(endpoint: Endpoint, reason: impl ToString) -> Self {
        Self::Unreachable {
            endpoint,
            reason: reason.to_string(),
        }
    }
}
