//! Prometheus text exposition format.
//!
//! Renders a cycle's samples for scraping by a Prometheus server or
//! compatible agent. Every family is a gauge: values are reported as
//! the upstream returned them.

use std::collections::HashMap;

use crate::sample::MetricSample;

/// Content type of the rendered payload.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render samples into Prometheus text format.
///
/// Samples sharing a name are grouped into one family under a single
/// HELP/TYPE header, in order of first appearance. The help text of the
/// family's first sample is used.
pub fn render_prometheus(samples: &[MetricSample]) -> String {
    let mut families: Vec<Vec<&MetricSample>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for sample in samples {
        match index.get(sample.name) {
            Some(&i) => families[i].push(sample),
            None => {
                index.insert(sample.name, families.len());
                families.push(vec![sample]);
            }
        }
    }

    let mut out = String::new();
    for family in &families {
        let head = family[0];
        out.push_str(&format!("# HELP {} {}\n", head.name, escape_help(head.help)));
        out.push_str(&format!("# TYPE {} gauge\n", head.name));
        for sample in family {
            out.push_str(sample.name);
            if !sample.labels.is_empty() {
                let labels: Vec<String> = sample
                    .labels
                    .iter()
                    .map(|(k, v)| format!("{k}=\"{}\"", escape_label_value(v)))
                    .collect();
                out.push('{');
                out.push_str(&labels.join(","));
                out.push('}');
            }
            out.push(' ');
            out.push_str(&format_value(sample.value));
            out.push('\n');
        }
    }
    out
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filestore(name: &'static str, fsname: &str, value: f64) -> MetricSample {
        MetricSample::gauge(name, "Filestore Space (bytes)", value)
            .with_label("mount_point", "/nexus-data")
            .with_label("fsname", fsname)
    }

    #[test]
    fn render_empty() {
        assert_eq!(render_prometheus(&[]), "");
    }

    #[test]
    fn render_unlabelled_gauge() {
        let output = render_prometheus(&[MetricSample::gauge(
            "nexus_processors_available",
            "Available Processors",
            8.0,
        )]);
        assert_eq!(
            output,
            "# HELP nexus_processors_available Available Processors\n\
             # TYPE nexus_processors_available gauge\n\
             nexus_processors_available 8\n"
        );
    }

    #[test]
    fn render_labelled_family_once() {
        let samples = vec![
            MetricSample::gauge("nexus_events_total", "Nexus Events Count", 0.0)
                .with_label("level", "trace"),
            MetricSample::gauge("nexus_events_total", "Nexus Events Count", 12.0)
                .with_label("level", "warn"),
        ];
        let output = render_prometheus(&samples);

        assert_eq!(output.matches("# TYPE nexus_events_total gauge").count(), 1);
        assert!(output.contains("nexus_events_total{level=\"trace\"} 0\n"));
        assert!(output.contains("nexus_events_total{level=\"warn\"} 12\n"));
    }

    #[test]
    fn interleaved_samples_are_grouped_by_family() {
        let samples = vec![
            filestore("nexus_filestore_total_space_bytes", "a", 1.0),
            filestore("nexus_filestore_usable_space_bytes", "a", 2.0),
            filestore("nexus_filestore_total_space_bytes", "b", 3.0),
            filestore("nexus_filestore_usable_space_bytes", "b", 4.0),
        ];
        let output = render_prometheus(&samples);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(
            lines,
            [
                "# HELP nexus_filestore_total_space_bytes Filestore Space (bytes)",
                "# TYPE nexus_filestore_total_space_bytes gauge",
                "nexus_filestore_total_space_bytes{mount_point=\"/nexus-data\",fsname=\"a\"} 1",
                "nexus_filestore_total_space_bytes{mount_point=\"/nexus-data\",fsname=\"b\"} 3",
                "# HELP nexus_filestore_usable_space_bytes Filestore Space (bytes)",
                "# TYPE nexus_filestore_usable_space_bytes gauge",
                "nexus_filestore_usable_space_bytes{mount_point=\"/nexus-data\",fsname=\"a\"} 2",
                "nexus_filestore_usable_space_bytes{mount_point=\"/nexus-data\",fsname=\"b\"} 4",
            ]
        );
    }

    #[test]
    fn label_values_are_escaped() {
        let sample = MetricSample::gauge("m", "h", 1.0).with_label("fsname", "C:\\ \"x\"\n");
        let output = render_prometheus(&[sample]);
        assert!(output.contains(r#"m{fsname="C:\\ \"x\"\n"} 1"#), "{output}");
    }

    #[test]
    fn fractional_and_special_values() {
        assert_eq!(format_value(3725.5), "3725.5");
        assert_eq!(format_value(107_374_182_400.0), "107374182400");
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(-1.0), "-1");
    }

    #[test]
    fn render_format_is_prometheus_compatible() {
        let samples = vec![
            MetricSample::gauge("nexus_threads_used", "Threads Used", 93.0),
            MetricSample::gauge("nexus_webapp_http_response_total", "Count", 7.0)
                .with_label("code", "2xx"),
        ];
        let output = render_prometheus(&samples);

        // Every non-comment line: metric_name[{labels}] value
        for line in output.lines() {
            if line.starts_with('#') {
                continue;
            }
            let (series, value) = line.rsplit_once(' ').expect("series and value");
            assert!(!series.is_empty());
            assert!(value.parse::<f64>().is_ok(), "bad value in: {line}");
        }
    }
}
