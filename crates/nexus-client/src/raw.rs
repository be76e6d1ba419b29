//! Parsed upstream documents.
//!
//! These are kept as generic JSON trees. Required-field extraction, with
//! typed errors for anything missing, happens in the mapper.

use serde_json::Value;

/// Body of `/service/rest/atlas/system-information`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSystemInfo(pub Value);

/// Body of `/service/metrics/data`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetricsData(pub Value);

impl RawSystemInfo {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl RawMetricsData {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawSystemInfo {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Value> for RawMetricsData {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
