//! Translation Engine - MBean attributes to metric families
//!
//! One [`TranslationEngine::collect`] call is one pass: reset, resolve the
//! CrateDB objects, read every attribute and route each value either to the
//! recorder of the object's kind or to the generic fallback path.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::collector::{
    AttributeDescriptor, AttributeValue, ManagedObjectRegistry, ObjectName, ObjectNamePattern,
    RegistrySource, ValueKind,
};
use crate::error::{RecorderError, RegistryError};
use crate::metrics::ExporterMetrics;

use super::model::{FamilyMap, MetricFamily, MetricSample, MetricType, SampleSink};
use super::naming::{angle_brackets, camel_case_to_lower, join_components};
use super::recorder::RecorderRegistry;
use super::store::AttributeValueStore;

/// Which objects a pass reads and how their metrics are named
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// MBean domain of the monitored objects
    pub source_domain: String,
    /// Key property pattern within the domain
    pub pattern: String,
    /// Metric name prefix replacing the source domain
    pub namespace: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            source_domain: "io.crate.monitoring".to_string(),
            pattern: "*".to_string(),
            namespace: "crate".to_string(),
        }
    }
}

impl EngineSettings {
    /// Full object name pattern, e.g. `io.crate.monitoring:*`
    pub fn object_pattern(&self) -> String {
        format!("{}:{}", self.source_domain, self.pattern)
    }
}

/// Counters of one pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    /// Objects whose descriptors could be listed
    pub objects: usize,
    /// Failed descriptor listings and attribute reads
    pub attribute_errors: u64,
    /// Values read but not turned into samples
    pub values_dropped: u64,
}

/// Metric translation engine
///
/// Passes are serialized: the recorder registry is locked for the whole pass
/// because recorders accumulate state across the attributes of a pass.
#[derive(Debug)]
pub struct TranslationEngine {
    settings: EngineSettings,
    pattern: Result<ObjectNamePattern, RegistryError>,
    recorders: Mutex<RecorderRegistry>,
    store: Arc<AttributeValueStore>,
    metrics: Arc<ExporterMetrics>,
}

impl TranslationEngine {
    /// Create an engine writing attribute values into `store`
    ///
    /// A malformed object pattern is not rejected here; every pass reports it
    /// as a resolution failure and yields no objects.
    pub fn new(settings: EngineSettings, store: Arc<AttributeValueStore>) -> Self {
        let pattern = ObjectNamePattern::parse(&settings.object_pattern());
        Self {
            settings,
            pattern,
            recorders: Mutex::new(RecorderRegistry::new()),
            store,
            metrics: Arc::new(ExporterMetrics::new()),
        }
    }

    /// Use shared exporter metrics
    pub fn with_metrics(mut self, metrics: Arc<ExporterMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Compiled object pattern, if well-formed
    pub fn object_pattern(&self) -> Option<&ObjectNamePattern> {
        self.pattern.as_ref().ok()
    }

    pub fn store(&self) -> &Arc<AttributeValueStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<ExporterMetrics> {
        &self.metrics
    }

    /// Fetch a snapshot from `source` and run one pass over it
    pub async fn scrape(&self, source: &RegistrySource) -> Result<Vec<MetricFamily>, RecorderError> {
        let snapshot = match self.object_pattern() {
            Some(pattern) => source.snapshot(pattern).await,
            None => Default::default(),
        };
        self.collect(&snapshot)
    }

    /// Run one translation pass against `registry`
    ///
    /// Resolution, descriptor and read failures are logged and skipped. The
    /// only error is a recorder handed a value variant it does not implement.
    pub fn collect(
        &self,
        registry: &dyn ManagedObjectRegistry,
    ) -> Result<Vec<MetricFamily>, RecorderError> {
        let start = Instant::now();
        let mut recorders = self.recorders.lock().unwrap_or_else(|e| e.into_inner());
        recorders.reset_all();

        let mut families = FamilyMap::new();
        let mut stats = PassStats::default();

        let objects = match &self.pattern {
            Ok(pattern) => registry.resolve(pattern),
            Err(e) => Err(e.clone()),
        };
        let objects = objects.unwrap_or_else(|e| {
            tracing::error!(
                pattern = %self.settings.object_pattern(),
                error = %e,
                "Cannot resolve CrateDB MBeans"
            );
            Vec::new()
        });

        for object in &objects {
            let descriptors = match registry.describe(object) {
                Ok(descriptors) => descriptors,
                Err(e) => {
                    tracing::error!(mbean = %object, error = %e, "Cannot get MBean info");
                    stats.attribute_errors += 1;
                    continue;
                }
            };
            stats.objects += 1;

            for descriptor in &descriptors {
                self.scrape_attribute(
                    &mut recorders,
                    registry,
                    object,
                    descriptor,
                    &mut families,
                    &mut stats,
                )?;
            }
        }
        drop(recorders);

        let elapsed = start.elapsed();
        self.metrics.record_pass(&stats, elapsed);
        tracing::debug!(
            objects = stats.objects,
            families = families.len(),
            samples = families.sample_count(),
            attribute_errors = stats.attribute_errors,
            values_dropped = stats.values_dropped,
            duration_ms = elapsed.as_millis() as u64,
            "Translation pass complete"
        );

        Ok(families.into_families())
    }

    fn scrape_attribute(
        &self,
        recorders: &mut RecorderRegistry,
        registry: &dyn ManagedObjectRegistry,
        object: &ObjectName,
        descriptor: &AttributeDescriptor,
        families: &mut FamilyMap,
        stats: &mut PassStats,
    ) -> Result<(), RecorderError> {
        if !descriptor.readable {
            tracing::debug!(mbean = %object, attribute = %descriptor.name, "not readable");
            return Ok(());
        }

        let value = match registry.read(object, &descriptor.name) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(mbean = %object, attribute = %descriptor.name, error = %e, "read failed");
                stats.attribute_errors += 1;
                return Ok(());
            }
        };

        match value.kind() {
            ValueKind::Null => {
                tracing::debug!(mbean = %object, attribute = %descriptor.name, "null value");
                stats.values_dropped += 1;
                return Ok(());
            }
            ValueKind::Unsupported => {
                tracing::debug!(
                    mbean = %object,
                    attribute = %descriptor.name,
                    declared_type = %descriptor.declared_type,
                    "type is not exported"
                );
                stats.values_dropped += 1;
                return Ok(());
            }
            _ => {}
        }

        let kind = object.primary_property().unwrap_or_default();
        self.store
            .put(AttributeValueStore::key(kind, &descriptor.name), value.clone());

        let consumed = match recorders.get_mut(kind) {
            Some(recorder) => {
                let ns = self.settings.namespace.as_str();
                let name = descriptor.name.as_str();
                match &value {
                    AttributeValue::Number(n) => recorder.record_number(ns, name, *n, families)?,
                    AttributeValue::Boolean(b) => {
                        recorder.record_number(ns, name, bool_to_f64(*b), families)?
                    }
                    AttributeValue::String(s) => recorder.record_string(ns, name, s, families)?,
                    AttributeValue::CompositeRecord(r) => {
                        recorder.record_composite(ns, name, r, families)?
                    }
                    AttributeValue::CompositeRecordArray(a) => {
                        recorder.record_composite_array(ns, name, a, families)?
                    }
                    AttributeValue::Null | AttributeValue::Unsupported => false,
                }
            }
            None => match &value {
                AttributeValue::Number(n) => {
                    self.default_export(object, descriptor, *n, families);
                    true
                }
                AttributeValue::Boolean(b) => {
                    self.default_export(object, descriptor, bool_to_f64(*b), families);
                    true
                }
                AttributeValue::String(_) => {
                    // strings without a recorder are names and versions, not metrics
                    tracing::trace!(mbean = %object, attribute = %descriptor.name, "string attribute ignored");
                    return Ok(());
                }
                _ => false,
            },
        };

        if !consumed {
            tracing::error!(
                kind = kind,
                attribute = %descriptor.name,
                value = %value,
                "Ignoring unsupported bean attribute"
            );
            stats.values_dropped += 1;
        }
        Ok(())
    }

    /// Domain with the source domain replaced by the namespace
    fn metric_domain(&self, object: &ObjectName) -> String {
        object
            .domain
            .replace(&self.settings.source_domain, &self.settings.namespace)
    }

    /// Generic fallback: one unlabeled untyped sample named
    /// `<domain>_<primaryProperty>_<attribute>` in lower snake case
    fn default_export(
        &self,
        object: &ObjectName,
        descriptor: &AttributeDescriptor,
        value: f64,
        sink: &mut dyn SampleSink,
    ) {
        let domain = self.metric_domain(object);
        let primary = object.primary_property().unwrap_or_default();
        let name = camel_case_to_lower(&join_components([
            domain.as_str(),
            primary,
            descriptor.name.as_str(),
        ]));
        let help = format!(
            "{} ({}{}{})",
            descriptor.description,
            object.domain,
            angle_brackets(&object.properties),
            descriptor.name
        );

        sink.accept(MetricSample::new(name, value), MetricType::Untyped, &help);
    }
}

fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
