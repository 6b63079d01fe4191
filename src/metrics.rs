//! Exporter self metrics
//!
//! Metrics about the exporter's own operation, merged into every metrics
//! response next to the translated CrateDB families.
//!
//! # Metrics
//!
//! - `jmx_exporter_build_info{version="..."}` - Always 1
//! - `jmx_exporter_scrapes_total` - Counter of translation passes
//! - `jmx_exporter_scrape_duration_seconds` - Duration of the last pass
//! - `jmx_exporter_objects_scraped` - Objects read in the last pass
//! - `jmx_exporter_attribute_errors_total` - Failed descriptor listings and reads
//! - `jmx_exporter_values_dropped_total` - Values read but not exported
//! - `process_start_time_seconds` - Start time of the exporter process

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::transformer::{MetricFamily, MetricSample, MetricType, PassStats};

/// Thread-safe counter using atomic operations
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Increment the counter by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the counter by a specific amount
    pub fn inc_by(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Thread-safe gauge using atomic operations
#[derive(Debug)]
pub struct Gauge {
    /// Stored as bits of f64 for atomic operations
    value: AtomicU64,
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new()
    }
}

impl Gauge {
    /// Create a new gauge initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Set the gauge to a specific value
    pub fn set(&self, v: f64) {
        self.value.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Set the gauge to the current Unix timestamp
    pub fn set_to_current_time(&self) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.set(timestamp);
    }
}

/// Exporter self metrics
///
/// Shared by the translation engine, which records every pass, and the
/// metrics endpoint, which renders them.
#[derive(Debug)]
pub struct ExporterMetrics {
    /// Counter of translation passes
    pub scrapes_total: Counter,
    /// Duration of the last pass
    pub scrape_duration_seconds: Gauge,
    /// Objects read in the last pass
    pub objects_scraped: Gauge,
    /// Failed descriptor listings and attribute reads
    pub attribute_errors_total: Counter,
    /// Values read but not turned into samples
    pub values_dropped_total: Counter,
    /// Process start time
    pub process_start_time_seconds: Gauge,
}

impl Default for ExporterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterMetrics {
    /// Create the metrics, stamping the process start time
    pub fn new() -> Self {
        let metrics = Self {
            scrapes_total: Counter::new(),
            scrape_duration_seconds: Gauge::new(),
            objects_scraped: Gauge::new(),
            attribute_errors_total: Counter::new(),
            values_dropped_total: Counter::new(),
            process_start_time_seconds: Gauge::new(),
        };
        metrics.process_start_time_seconds.set_to_current_time();
        metrics
    }

    /// Record the outcome of one translation pass
    pub fn record_pass(&self, stats: &PassStats, duration: Duration) {
        self.scrapes_total.inc();
        self.scrape_duration_seconds.set(duration.as_secs_f64());
        self.objects_scraped.set(stats.objects as f64);
        self.attribute_errors_total.inc_by(stats.attribute_errors);
        self.values_dropped_total.inc_by(stats.values_dropped);
    }

    /// Render as metric families, sorted by name
    pub fn to_families(&self) -> Vec<MetricFamily> {
        let mut families = vec![
            MetricFamily::new(
                "jmx_exporter_build_info",
                MetricType::Gauge,
                "A metric with a constant '1' value labeled with the version of the exporter",
            )
            .with_sample(
                MetricSample::new("jmx_exporter_build_info", 1.0)
                    .with_label("version", env!("CARGO_PKG_VERSION")),
            ),
            Self::single(
                "jmx_exporter_scrapes_total",
                MetricType::Counter,
                "Total number of translation passes",
                self.scrapes_total.get() as f64,
            ),
            Self::single(
                "jmx_exporter_scrape_duration_seconds",
                MetricType::Gauge,
                "Duration of the last translation pass in seconds",
                self.scrape_duration_seconds.get(),
            ),
            Self::single(
                "jmx_exporter_objects_scraped",
                MetricType::Gauge,
                "Number of MBeans read in the last translation pass",
                self.objects_scraped.get(),
            ),
            Self::single(
                "jmx_exporter_attribute_errors_total",
                MetricType::Counter,
                "Total number of failed MBean info lookups and attribute reads",
                self.attribute_errors_total.get() as f64,
            ),
            Self::single(
                "jmx_exporter_values_dropped_total",
                MetricType::Counter,
                "Total number of attribute values that were read but not exported",
                self.values_dropped_total.get() as f64,
            ),
            Self::single(
                "process_start_time_seconds",
                MetricType::Gauge,
                "Start time of the process since unix epoch in seconds",
                self.process_start_time_seconds.get(),
            ),
        ];
        families.sort_by(|a, b| a.name.cmp(&b.name));
        families
    }

    fn single(name: &str, metric_type: MetricType, help: &str, value: f64) -> MetricFamily {
        MetricFamily::new(name, metric_type, help).with_sample(MetricSample::new(name, value))
    }
}
