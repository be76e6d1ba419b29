//! Upstream target and credential.
//!
//! Both are validated once at startup and never change afterwards.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::HeaderValue;
use http::uri::{Authority, Scheme, Uri};

use crate::client::Endpoint;
use crate::error::ConfigError;

/// Admin username and password for the monitored instance.
///
/// The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamCredential {
    username: String,
    password: String,
}

impl UpstreamCredential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Build the `Authorization` header value (`Basic base64(user:password)`).
    ///
    /// The value is marked sensitive so hyper never logs it.
    pub fn authorization(&self) -> Result<HeaderValue, ConfigError> {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut value = HeaderValue::from_str(&format!("Basic {token}"))
            .map_err(|_| ConfigError::InvalidCredential)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for UpstreamCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Base URL of the monitored instance, trailing slashes stripped.
///
/// A path prefix (e.g. `http://proxy/nexus`) is kept and the endpoint
/// paths are appended to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    base: String,
    authority: Authority,
    path_prefix: String,
}

impl Target {
    /// Validate a base URL: it must carry a scheme and a host.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');

        // Checked first so no error message echoes userinfo back.
        let after_scheme = trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest);
        let authority_part = after_scheme.split(['/', '?', '#']).next().unwrap_or_default();
        if authority_part.contains('@') {
            return Err(ConfigError::EmbeddedCredentials);
        }

        let uri: Uri = trimmed.parse().map_err(|e: http::uri::InvalidUri| {
            ConfigError::InvalidUri {
                input: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        let scheme = uri
            .scheme()
            .ok_or_else(|| ConfigError::MissingScheme(raw.to_string()))?;
        let authority = uri
            .authority()
            .filter(|a| !a.host().is_empty())
            .cloned()
            .ok_or_else(|| ConfigError::MissingHost(raw.to_string()))?;
        if *scheme != Scheme::HTTP {
            return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
        }

        Ok(Self {
            base: trimmed.to_string(),
            path_prefix: uri.path().trim_end_matches('/').to_string(),
            authority,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Value for the `Host` header.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// `host:port` to open a TCP connection to (port 80 when omitted).
    pub fn socket_addr(&self) -> String {
        format!(
            "{}:{}",
            self.authority.host(),
            self.authority.port_u16().unwrap_or(80)
        )
    }

    /// Origin-form request target for an endpoint.
    pub fn request_path(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.path_prefix, endpoint.path())
    }

    /// Absolute URL of an endpoint, for diagnostics.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base, endpoint.path())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
