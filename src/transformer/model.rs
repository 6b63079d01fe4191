//! Metric family model
//!
//! The abstract sample/family structures a text exposition writer consumes.

use std::collections::BTreeMap;

/// Prometheus metric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricType {
    /// Gauge metric - a value that can go up and down
    Gauge,
    /// Counter metric - a monotonically increasing value
    Counter,
    /// Untyped metric - type is not specified
    #[default]
    Untyped,
}

impl MetricType {
    /// Returns the Prometheus type string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Counter => "counter",
            MetricType::Untyped => "untyped",
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observation: a name, ordered labels and a value
///
/// `label_names` and `label_values` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub label_names: Vec<String>,
    pub label_values: Vec<String>,
    pub value: f64,
}

impl MetricSample {
    /// Sample without labels
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            label_names: Vec::new(),
            label_values: Vec::new(),
            value,
        }
    }

    /// Append a label; a repeated label name replaces the earlier value
    pub fn with_label(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.label_names.iter().position(|n| n == name) {
            Some(idx) => self.label_values[idx] = value,
            None => {
                self.label_names.push(name.to_string());
                self.label_values.push(value);
            }
        }
        self
    }

    /// Label value by name
    pub fn label(&self, name: &str) -> Option<&str> {
        self.label_names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.label_values[idx].as_str())
    }

    /// Iterate `(name, value)` label pairs in declaration order
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.label_names
            .iter()
            .map(String::as_str)
            .zip(self.label_values.iter().map(String::as_str))
    }
}

/// Samples sharing a metric name, type and help text
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub metric_type: MetricType,
    pub help: String,
    pub samples: Vec<MetricSample>,
}

impl MetricFamily {
    /// Empty family
    pub fn new(name: impl Into<String>, metric_type: MetricType, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metric_type,
            help: help.into(),
            samples: Vec::new(),
        }
    }

    /// Append a sample
    pub fn with_sample(mut self, sample: MetricSample) -> Self {
        self.samples.push(sample);
        self
    }
}

/// Receiver of samples emitted by recorders and the fallback path
pub trait SampleSink {
    /// Accept one sample together with its family's type and help text
    fn accept(&mut self, sample: MetricSample, metric_type: MetricType, help: &str);
}

/// Family accumulation map of one pass, keyed by final metric name
///
/// The first sample of a name fixes the family's type and help text.
#[derive(Debug, Default)]
pub struct FamilyMap {
    families: BTreeMap<String, MetricFamily>,
}

impl FamilyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MetricFamily> {
        self.families.get(name)
    }

    /// Total number of samples across all families
    pub fn sample_count(&self) -> usize {
        self.families.values().map(|f| f.samples.len()).sum()
    }

    /// Families sorted by name
    pub fn into_families(self) -> Vec<MetricFamily> {
        self.families.into_values().collect()
    }
}

impl SampleSink for FamilyMap {
    fn accept(&mut self, sample: MetricSample, metric_type: MetricType, help: &str) {
        tracing::trace!(
            name = %sample.name,
            labels = ?sample.label_values,
            value = sample.value,
            "add metric sample"
        );
        self.families
            .entry(sample.name.clone())
            .or_insert_with(|| MetricFamily::new(sample.name.clone(), metric_type, help))
            .samples
            .push(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_type_as_str() {
        assert_eq!(MetricType::Gauge.as_str(), "gauge");
        assert_eq!(MetricType::Counter.as_str(), "counter");
        assert_eq!(MetricType::Untyped.to_string(), "untyped");
    }

    #[test]
    fn test_sample_labels_stay_aligned() {
        let sample = MetricSample::new("crate_connections", 1.0)
            .with_label("protocol", "http")
            .with_label("property", "open")
            .with_label("protocol", "psql");

        assert_eq!(sample.label_names, vec!["protocol", "property"]);
        assert_eq!(sample.label_values, vec!["psql", "open"]);
        assert_eq!(sample.label("property"), Some("open"));
        assert_eq!(sample.labels().count(), 2);
    }

    #[test]
    fn test_family_map_groups_by_name() {
        let mut map = FamilyMap::new();
        map.accept(
            MetricSample::new("crate_queries", 1.0).with_label("query", "Select"),
            MetricType::Gauge,
            "Queries per second",
        );
        map.accept(
            MetricSample::new("crate_queries", 2.0).with_label("query", "Insert"),
            MetricType::Untyped,
            "ignored",
        );
        map.accept(MetricSample::new("crate_ready", 1.0), MetricType::Gauge, "Ready");

        assert_eq!(map.len(), 2);
        assert_eq!(map.sample_count(), 3);

        let queries = map.get("crate_queries").unwrap();
        assert_eq!(queries.metric_type, MetricType::Gauge);
        assert_eq!(queries.help, "Queries per second");
        assert_eq!(queries.samples.len(), 2);
    }

    #[test]
    fn test_into_families_sorted() {
        let mut map = FamilyMap::new();
        map.accept(MetricSample::new("zeta", 1.0), MetricType::Gauge, "");
        map.accept(MetricSample::new("alpha", 1.0), MetricType::Gauge, "");

        let names: Vec<String> = map.into_families().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
