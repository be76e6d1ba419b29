//! Mapping error types.

use thiserror::Error;

/// A required field could not be read from an upstream document.
///
/// `path` is rendered like `system-runtime.freeMemory` or
/// `gauges["jvm.memory.heap.used"].value`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("missing field `{path}`")]
    MissingField { path: String },

    #[error("field `{path}` is not a {expected}")]
    InvalidField { path: String, expected: &'static str },
}

impl MappingError {
    /// Path of the offending field.
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path } | Self::InvalidField { path, .. } => path,
        }
    }
}
