//! nexus-metrics — the metric mapping for the Nexus exporter.
//!
//! Turns one cycle's pair of upstream documents into an ordered list of
//! gauge samples, and renders sample lists in the Prometheus text format.
//!
//! # Architecture
//!
//! ```text
//! map_samples(RawSystemInfo, RawMetricsData)
//!   ├── system-runtime      → 5 runtime gauges
//!   ├── system-filestores   → 3 gauges per filestore entry
//!   ├── gauges              → 12 JVM memory gauges + uptime
//!   ├── meters              → events by level, responses by code class
//!   └── timers              → requests by method
//!       → Vec<MetricSample> | MappingError
//!
//! render_prometheus(&[MetricSample]) → text/plain for /metrics
//! ```
//!
//! Mapping is all-or-nothing: a single missing field fails the whole
//! cycle instead of being reported as zero.

pub mod error;
pub mod mapper;
pub mod prometheus;
pub mod sample;

pub use error::MappingError;
pub use mapper::{FIXED_SAMPLE_COUNT, map_samples, mount_point};
pub use prometheus::{CONTENT_TYPE, render_prometheus};
pub use sample::MetricSample;
