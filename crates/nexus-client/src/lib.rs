//! nexus-client — upstream access for the Nexus exporter.
//!
//! Issues the two authenticated GET requests a collection cycle needs and
//! hands back the parsed JSON documents untouched. Interpretation of the
//! documents belongs to `nexus-metrics`.
//!
//! # Architecture
//!
//! ```text
//! UpstreamClient (one per process, immutable)
//!   ├── Target          base URL, validated at startup
//!   ├── Authorization   "Basic <token>" built once from UpstreamCredential
//!   └── fetch()         → (RawSystemInfo, RawMetricsData)
//!         ├── GET {target}/service/rest/atlas/system-information
//!         └── GET {target}/service/metrics/data
//! ```
//!
//! Both requests run concurrently on their own connections. There is no
//! retry and no caching: one failure surfaces as one [`FetchError`].

pub mod client;
pub mod config;
pub mod error;
pub mod raw;

pub use client::{Endpoint, UpstreamClient};
pub use config::{Target, UpstreamCredential};
pub use error::{ConfigError, FetchError};
pub use raw::{RawMetricsData, RawSystemInfo};
