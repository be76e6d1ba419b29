//! Field mapping from the upstream documents to gauge samples.
//!
//! Metric names and labels are fixed; existing dashboards depend on them.

use nexus_client::{RawMetricsData, RawSystemInfo};
use serde_json::{Map, Value};

use crate::error::MappingError;
use crate::sample::MetricSample;

/// Samples emitted regardless of how many filestores exist:
/// 5 runtime + 13 JVM + 5 event levels + 5 response classes + 10 methods.
pub const FIXED_SAMPLE_COUNT: usize = 38;

/// Prefix of the Jetty web application metric identifiers.
const WEBAPP_CONTEXT: &str = "org.eclipse.jetty.webapp.WebAppContext";

/// `system-runtime` field → (name, help).
const RUNTIME: [(&str, &str, &str); 5] = [
    ("availableProcessors", "nexus_processors_available", "Available Processors"),
    ("freeMemory", "nexus_free_memory_bytes", "Free Memory (bytes)"),
    ("totalMemory", "nexus_total_memory_bytes", "Total Memory (bytes)"),
    ("maxMemory", "nexus_max_memory_bytes", "Max Memory (bytes)"),
    ("threads", "nexus_threads_used", "Threads Used"),
];

/// Filestore field → (name, help). Emitted as a triplet per entry.
const FILESTORE: [(&str, &str, &str); 3] = [
    (
        "totalSpace",
        "nexus_filestore_total_space_bytes",
        "Total Filestore Space (bytes)",
    ),
    (
        "usableSpace",
        "nexus_filestore_usable_space_bytes",
        "Usable Filestore Space (bytes)",
    ),
    (
        "unallocatedSpace",
        "nexus_filestore_unallocated_space_bytes",
        "Unallocated Filestore Space (bytes)",
    ),
];

/// `gauges` key → (name, help).
const JVM_MEMORY: [(&str, &str, &str); 12] = [
    (
        "jvm.memory.heap.committed",
        "nexus_jvm_memory_heap_committed_bytes",
        "JVM heap memory committed (bytes)",
    ),
    (
        "jvm.memory.heap.init",
        "nexus_jvm_memory_heap_init_bytes",
        "JVM heap memory initially requested (bytes)",
    ),
    (
        "jvm.memory.heap.max",
        "nexus_jvm_memory_heap_max_bytes",
        "JVM heap memory maximum (bytes)",
    ),
    (
        "jvm.memory.heap.used",
        "nexus_jvm_memory_heap_used_bytes",
        "JVM heap memory used (bytes)",
    ),
    (
        "jvm.memory.non-heap.committed",
        "nexus_jvm_memory_nonheap_committed_bytes",
        "JVM non-heap memory committed (bytes)",
    ),
    (
        "jvm.memory.non-heap.init",
        "nexus_jvm_memory_nonheap_init_bytes",
        "JVM non-heap memory initially requested (bytes)",
    ),
    (
        "jvm.memory.non-heap.max",
        "nexus_jvm_memory_nonheap_max_bytes",
        "JVM non-heap memory maximum (bytes)",
    ),
    (
        "jvm.memory.non-heap.used",
        "nexus_jvm_memory_nonheap_used_bytes",
        "JVM non-heap memory used (bytes)",
    ),
    (
        "jvm.memory.total.committed",
        "nexus_jvm_memory_total_committed_bytes",
        "JVM total memory committed (bytes)",
    ),
    (
        "jvm.memory.total.init",
        "nexus_jvm_memory_total_init_bytes",
        "JVM total memory initially requested (bytes)",
    ),
    (
        "jvm.memory.total.max",
        "nexus_jvm_memory_total_max_bytes",
        "JVM total memory maximum (bytes)",
    ),
    (
        "jvm.memory.total.used",
        "nexus_jvm_memory_total_used_bytes",
        "JVM total memory used (bytes)",
    ),
];

const EVENT_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

const RESPONSE_CODES: [&str; 5] = ["1xx", "2xx", "3xx", "4xx", "5xx"];

const REQUEST_METHODS: [&str; 10] = [
    "connect", "delete", "get", "head", "move", "options", "other", "post", "put", "trace",
];

/// Map one cycle's documents to samples.
///
/// Output order is fixed: runtime, filestores (sorted by key, three
/// samples each), JVM memory, uptime, events, responses, requests.
/// Any missing or mistyped field fails the whole call.
pub fn map_samples(
    info: &RawSystemInfo,
    data: &RawMetricsData,
) -> Result<Vec<MetricSample>, MappingError> {
    let info = info.as_value();
    let data = data.as_value();

    let runtime = section(info, "system-runtime")?;
    let filestores = section(info, "system-filestores")?;
    let gauges = section(data, "gauges")?;
    let meters = section(data, "meters")?;
    let timers = section(data, "timers")?;

    let mut samples = Vec::with_capacity(FIXED_SAMPLE_COUNT + FILESTORE.len() * filestores.len());

    for (field, name, help) in RUNTIME {
        let value = number(runtime, field, &format!("system-runtime.{field}"))?;
        samples.push(MetricSample::gauge(name, help, value));
    }

    for (fsname, details) in filestores {
        push_filestore(&mut samples, fsname, details)?;
    }

    for (key, name, help) in JVM_MEMORY {
        let value = entry_number(gauges, "gauges", key, "value")?;
        samples.push(MetricSample::gauge(name, help, value));
    }

    // Upstream reports milliseconds.
    let uptime_ms = entry_number(gauges, "gauges", "jvm.vm.uptime", "value")?;
    samples.push(MetricSample::gauge(
        "nexus_jvm_uptime_seconds",
        "JVM uptime (seconds)",
        uptime_ms / 1000.0,
    ));

    for level in EVENT_LEVELS {
        let count = entry_number(meters, "meters", &format!("metrics.{level}"), "count")?;
        samples.push(
            MetricSample::gauge("nexus_events_total", "Nexus Events Count", count)
                .with_label("level", level),
        );
    }

    for code in RESPONSE_CODES {
        let key = format!("{WEBAPP_CONTEXT}.{code}-responses");
        let count = entry_number(meters, "meters", &key, "count")?;
        samples.push(
            MetricSample::gauge(
                "nexus_webapp_http_response_total",
                "Nexus Webapp HTTP Response Count",
                count,
            )
            .with_label("code", code),
        );
    }

    for method in REQUEST_METHODS {
        let key = format!("{WEBAPP_CONTEXT}.{method}-requests");
        let count = entry_number(timers, "timers", &key, "count")?;
        samples.push(
            MetricSample::gauge(
                "nexus_webapp_http_request_total",
                "Nexus Webapp HTTP Request Count",
                count,
            )
            .with_label("method", method),
        );
    }

    Ok(samples)
}

/// Mount point shown in a filestore description such as
/// `"/nexus-data (/dev/sda1)"`: the text before the first `(`, trimmed.
pub fn mount_point(description: &str) -> &str {
    description
        .split_once('(')
        .map_or(description, |(before, _)| before)
        .trim()
}

fn push_filestore(
    samples: &mut Vec<MetricSample>,
    fsname: &str,
    details: &Value,
) -> Result<(), MappingError> {
    let path = format!("system-filestores[{fsname:?}]");
    let details = as_object(details, &path)?;

    let description = string(details, "description", &path)?;
    let fstype = string(details, "type", &path)?;
    let read_only = boolean(details, "readOnly", &path)?;
    let mount = mount_point(description);

    for (field, name, help) in FILESTORE {
        let value = number(details, field, &format!("{path}.{field}"))?;
        samples.push(
            MetricSample::gauge(name, help, value)
                .with_label("mount_point", mount)
                .with_label("fsname", fsname)
                .with_label("fstype", fstype)
                .with_label("readonly", if read_only { "True" } else { "False" }),
        );
    }
    Ok(())
}

// ── Field extraction ───────────────────────────────────────────

fn missing(path: impl Into<String>) -> MappingError {
    MappingError::MissingField { path: path.into() }
}

fn invalid(path: impl Into<String>, expected: &'static str) -> MappingError {
    MappingError::InvalidField {
        path: path.into(),
        expected,
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, MappingError> {
    value.as_object().ok_or_else(|| invalid(path, "object"))
}

/// A top-level object member of a document.
fn section<'a>(document: &'a Value, key: &str) -> Result<&'a Map<String, Value>, MappingError> {
    let root = document.as_object().ok_or_else(|| missing(key))?;
    let value = root.get(key).ok_or_else(|| missing(key))?;
    as_object(value, key)
}

fn number(object: &Map<String, Value>, key: &str, path: &str) -> Result<f64, MappingError> {
    object
        .get(key)
        .ok_or_else(|| missing(path))?
        .as_f64()
        .ok_or_else(|| invalid(path, "number"))
}

fn string<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    parent: &str,
) -> Result<&'a str, MappingError> {
    let path = || format!("{parent}.{key}");
    object
        .get(key)
        .ok_or_else(|| missing(path()))?
        .as_str()
        .ok_or_else(|| invalid(path(), "string"))
}

fn boolean(object: &Map<String, Value>, key: &str, parent: &str) -> Result<bool, MappingError> {
    let path = || format!("{parent}.{key}");
    object
        .get(key)
        .ok_or_else(|| missing(path()))?
        .as_bool()
        .ok_or_else(|| invalid(path(), "boolean"))
}

/// `section[key].field` where `key` is a dotted metric identifier.
fn entry_number(
    section: &Map<String, Value>,
    section_name: &str,
    key: &str,
    field: &str,
) -> Result<f64, MappingError> {
    let entry_path = format!("{section_name}[{key:?}]");
    let entry = section.get(key).ok_or_else(|| missing(entry_path.as_str()))?;
    let entry = as_object(entry, &entry_path)?;
    number(entry, field, &format!("{entry_path}.{field}"))
}
