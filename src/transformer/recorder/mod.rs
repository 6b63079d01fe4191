//! Per-kind recorders
//!
//! A recorder knows how to decompose the attributes of one kind of CrateDB
//! MBean (`type=QueryStats`, `type=Connections`, ...) into labeled samples.
//! Objects whose kind has a recorder never go through the generic fallback
//! path: the recorder owns the attribute space of its kind.

mod circuit_breakers;
mod connections;
mod node_info;
mod node_status;
mod query_stats;
mod thread_pools;

use std::collections::HashMap;

pub use circuit_breakers::CircuitBreakers;
pub use connections::Connections;
pub use node_info::NodeInfo;
pub use node_status::{NodeStatus, READY_KEY};
pub use query_stats::QueryStats;
pub use thread_pools::ThreadPools;

use super::model::{MetricSample, MetricType, SampleSink};
use crate::collector::{AttributeValue, CompositeRecord, ValueKind};
use crate::error::RecorderError;

/// `Ok(true)` if the attribute was consumed, `Ok(false)` if the recorder
/// declines it, `Err` if the value variant is not implemented at all
pub type RecordResult = Result<bool, RecorderError>;

/// Translation strategy for one object kind
///
/// `domain` is the metric namespace (e.g. `crate`). Booleans arrive through
/// [`Recorder::record_number`] as `1.0` / `0.0`.
pub trait Recorder: Send {
    /// Kind name this recorder is registered under
    fn kind(&self) -> &'static str;

    fn record_number(
        &mut self,
        domain: &str,
        attr_name: &str,
        value: f64,
        sink: &mut dyn SampleSink,
    ) -> RecordResult;

    fn record_string(
        &mut self,
        domain: &str,
        attr_name: &str,
        value: &str,
        sink: &mut dyn SampleSink,
    ) -> RecordResult;

    fn record_composite(
        &mut self,
        _domain: &str,
        attr_name: &str,
        _value: &CompositeRecord,
        _sink: &mut dyn SampleSink,
    ) -> RecordResult {
        Err(RecorderError::unsupported(
            self.kind(),
            ValueKind::CompositeRecord,
            attr_name,
        ))
    }

    fn record_composite_array(
        &mut self,
        _domain: &str,
        attr_name: &str,
        _value: &[CompositeRecord],
        _sink: &mut dyn SampleSink,
    ) -> RecordResult {
        Err(RecorderError::unsupported(
            self.kind(),
            ValueKind::CompositeRecordArray,
            attr_name,
        ))
    }

    /// Clear state accumulated across attributes; called once before every pass
    fn reset(&mut self) {}
}

/// Fixed mapping from object kind to recorder
pub struct RecorderRegistry {
    recorders: HashMap<&'static str, Box<dyn Recorder>>,
}

impl RecorderRegistry {
    /// Registry with every CrateDB recorder
    pub fn new() -> Self {
        let recorders: Vec<Box<dyn Recorder>> = vec![
            Box::new(QueryStats),
            Box::new(NodeStatus),
            Box::new(NodeInfo::default()),
            Box::new(Connections),
            Box::new(ThreadPools),
            Box::new(CircuitBreakers),
        ];

        Self {
            recorders: recorders.into_iter().map(|r| (r.kind(), r)).collect(),
        }
    }

    /// Recorder for an object kind (exact match)
    pub fn get_mut(&mut self, kind: &str) -> Option<&mut (dyn Recorder + 'static)> {
        self.recorders.get_mut(kind).map(|r| r.as_mut())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.recorders.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<&'static str> = self.recorders.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn reset_all(&mut self) {
        self.recorders.values_mut().for_each(|r| r.reset());
    }
}

impl Default for RecorderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecorderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Flatten a composite record carrying a `name` field into one sample per
/// numeric field, labeled `{name, property}`
///
/// Returns `false` if the record has no string `name` field.
pub(crate) fn record_named_composite(
    metric_name: &str,
    help: &str,
    record: &CompositeRecord,
    sink: &mut dyn SampleSink,
) -> bool {
    let Some(name) = record.get("name").and_then(AttributeValue::as_str) else {
        return false;
    };
    let name = name.to_lowercase();

    for (property, value) in record {
        // non-numeric values (e.g. the name itself) are not samples
        let Some(number) = value.as_f64() else {
            continue;
        };
        sink.accept(
            MetricSample::new(metric_name, number)
                .with_label("name", name.as_str())
                .with_label("property", property.as_str()),
            MetricType::Gauge,
            help,
        );
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::model::FamilyMap;

    #[test]
    fn test_registry_kinds() {
        let registry = RecorderRegistry::new();
        assert_eq!(
            registry.kinds(),
            vec![
                "CircuitBreakers",
                "Connections",
                "NodeInfo",
                "NodeStatus",
                "QueryStats",
                "ThreadPools"
            ]
        );
        assert!(registry.contains("QueryStats"));
        assert!(!registry.contains("queryStats"));
        assert!(!registry.contains("DummyStatus"));
    }

    #[test]
    fn test_registry_lookup_is_exact() {
        let mut registry = RecorderRegistry::new();
        assert!(registry.get_mut("NodeInfo").is_some());
        assert!(registry.get_mut("nodeinfo").is_none());
        assert!(registry.get_mut("io.crate.monitoring").is_none());
    }

    #[test]
    fn test_reset_all_clears_node_info_state() {
        let mut registry = RecorderRegistry::new();
        let mut sink = FamilyMap::new();
        let recorder = registry.get_mut("NodeInfo").unwrap();
        recorder
            .record_string("crate", "NodeId", "id-1", &mut sink)
            .unwrap();

        registry.reset_all();

        let recorder = registry.get_mut("NodeInfo").unwrap();
        recorder
            .record_string("crate", "NodeName", "node-1", &mut sink)
            .unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_record_named_composite() {
        let record = CompositeRecord::from([
            ("name".to_string(), AttributeValue::String("Search".to_string())),
            ("active".to_string(), AttributeValue::Number(2.0)),
            ("completed".to_string(), AttributeValue::Number(42.0)),
            ("enabled".to_string(), AttributeValue::Boolean(true)),
        ]);

        let mut sink = FamilyMap::new();
        assert!(record_named_composite("crate_threadpools", "help", &record, &mut sink));

        let family = sink.get("crate_threadpools").unwrap();
        assert_eq!(family.samples.len(), 2);
        assert_eq!(family.samples[0].label_values, vec!["search", "active"]);
        assert_eq!(family.samples[1].label_values, vec!["search", "completed"]);
    }

    #[test]
    fn test_record_named_composite_without_name() {
        let record = CompositeRecord::from([("active".to_string(), AttributeValue::Number(2.0))]);
        let mut sink = FamilyMap::new();
        assert!(!record_named_composite("crate_threadpools", "help", &record, &mut sink));
        assert!(sink.is_empty());
    }
}
