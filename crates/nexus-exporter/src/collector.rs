//! Collection coordinator — one fetch-and-map cycle per scrape.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, error, warn};

use nexus_client::{FetchError, UpstreamClient};
use nexus_metrics::{MappingError, MetricSample, map_samples};

/// A failed collection cycle.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("upstream document incompatible: {0}")]
    Mapping(#[from] MappingError),
}

/// What to do when a cycle fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log, print a diagnostic to stderr and exit with status 1.
    Terminate,
    /// Return the error to the caller.
    Propagate,
}

/// Runs collection cycles against one upstream.
///
/// Holds no mutable state: concurrent scrapes each run their own cycle
/// on their own documents.
#[derive(Debug)]
pub struct Collector {
    client: UpstreamClient,
    policy: FailurePolicy,
}

impl Collector {
    pub fn new(client: UpstreamClient, policy: FailurePolicy) -> Self {
        Self { client, policy }
    }

    /// Run one cycle: fetch both documents, then map them.
    ///
    /// Under [`FailurePolicy::Terminate`] this never returns an error.
    pub async fn collect(&self) -> Result<Vec<MetricSample>, CollectError> {
        let started = Instant::now();
        match self.cycle().await {
            Ok(samples) => {
                debug!(
                    samples = samples.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "collection cycle complete"
                );
                Ok(samples)
            }
            Err(e) => match self.policy {
                FailurePolicy::Terminate => terminate(&e),
                FailurePolicy::Propagate => {
                    warn!(error = %e, "collection cycle failed");
                    Err(e)
                }
            },
        }
    }

    async fn cycle(&self) -> Result<Vec<MetricSample>, CollectError> {
        let (info, data) = self.client.fetch().await?;
        Ok(map_samples(&info, &data)?)
    }
}

fn terminate(err: &CollectError) -> ! {
    let unauthorized = matches!(err, CollectError::Fetch(f) if f.is_unauthorized());
    error!(
        error = %err,
        unauthorized,
        "collection failed, exiting for restart"
    );
    eprintln!("nexus-exporter: {err}");
    std::process::exit(1);
}
