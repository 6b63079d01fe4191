//! Prometheus Exposition Format output
//!
//! This module writes metric families in the Prometheus text exposition
//! format (version 0.0.4).
//!
//! # Format Specification
//!
//! ```text
//! # HELP <metric_name> <help_text>
//! # TYPE <metric_name> <type>
//! <metric_name>{<label1>="<value1>",<label2>="<value2>"} <value>
//! ```

use std::collections::HashSet;
use std::fmt::Write;

use super::model::{MetricFamily, MetricSample};

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Prometheus exposition format formatter
///
/// # Example
///
/// ```ignore
/// use crate_jmx_exporter::transformer::{MetricFamily, MetricSample, MetricType, PrometheusFormatter};
///
/// let families = vec![MetricFamily::new("crate_ready", MetricType::Gauge, "Node readiness")
///     .with_sample(MetricSample::new("crate_ready", 1.0))];
///
/// let output = PrometheusFormatter::new().format(&families);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrometheusFormatter {
    /// Only write families with these names
    name_filter: Option<HashSet<String>>,
}

impl PrometheusFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict output to families whose name is one of `names`
    ///
    /// An empty list leaves the output unfiltered.
    pub fn with_name_filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: HashSet<String> = names.into_iter().map(Into::into).collect();
        self.name_filter = if names.is_empty() { None } else { Some(names) };
        self
    }

    /// Whether a family passes the name filter
    pub fn includes(&self, name: &str) -> bool {
        self.name_filter
            .as_ref()
            .map(|names| names.contains(name))
            .unwrap_or(true)
    }

    /// Format families into Prometheus exposition format
    ///
    /// Families are written in the given order. Labels keep the order in
    /// which the sample declared them.
    pub fn format(&self, families: &[MetricFamily]) -> String {
        let mut output = String::with_capacity(families.len() * 128);

        for family in families.iter().filter(|f| self.includes(&f.name)) {
            let _ = writeln!(
                output,
                "# HELP {} {}",
                family.name,
                Self::escape_help(&family.help)
            );
            let _ = writeln!(output, "# TYPE {} {}", family.name, family.metric_type.as_str());

            for sample in &family.samples {
                output.push_str(&Self::format_sample_line(sample));
                output.push('\n');
            }
        }

        output
    }

    /// Format a single sample line
    fn format_sample_line(sample: &MetricSample) -> String {
        let mut line = sample.name.clone();

        if !sample.label_names.is_empty() {
            let label_pairs: Vec<String> = sample
                .labels()
                .map(|(k, v)| format!("{}=\"{}\"", k, Self::escape_label_value(v)))
                .collect();

            line.push('{');
            line.push_str(&label_pairs.join(","));
            line.push('}');
        }

        line.push(' ');
        line.push_str(&Self::format_value(sample.value));
        line
    }

    /// Format a numeric value for Prometheus
    ///
    /// - NaN → "NaN"
    /// - +Inf → "+Inf"
    /// - -Inf → "-Inf"
    /// - Integers are formatted without decimal point
    /// - Large/small floats use scientific notation
    fn format_value(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            if value.is_sign_positive() {
                "+Inf".to_string()
            } else {
                "-Inf".to_string()
            }
        } else if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else if value.abs() >= 1e6 || (value.abs() < 1e-3 && value != 0.0) {
            format!("{:e}", value)
        } else {
            format!("{}", value)
        }
    }

    /// Escape help text
    ///
    /// Escapes backslash and newline characters.
    fn escape_help(help: &str) -> String {
        help.replace('\\', "\\\\").replace('\n', "\\n")
    }

    /// Escape label value
    ///
    /// Escapes backslash, double-quote, and newline characters.
    fn escape_label_value(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}
