//! `type=NodeStatus` recorder

use super::{RecordResult, Recorder};
use crate::transformer::model::{MetricSample, MetricType, SampleSink};

/// Store key of the node readiness flag, read by the readiness endpoint
pub const READY_KEY: &str = "NodeStatus_Ready";

const READY_HELP: &str = "Whether the node is ready to process requests (1) or not (0).";

#[derive(Debug, Default, Clone, Copy)]
pub struct NodeStatus;

impl Recorder for NodeStatus {
    fn kind(&self) -> &'static str {
        "NodeStatus"
    }

    fn record_number(
        &mut self,
        domain: &str,
        attr_name: &str,
        value: f64,
        sink: &mut dyn SampleSink,
    ) -> RecordResult {
        if attr_name != "Ready" {
            return Ok(false);
        }

        sink.accept(
            MetricSample::new(format!("{}_ready", domain), value),
            MetricType::Gauge,
            READY_HELP,
        );
        Ok(true)
    }

    fn record_string(
        &mut self,
        _domain: &str,
        _attr_name: &str,
        _value: &str,
        _sink: &mut dyn SampleSink,
    ) -> RecordResult {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::model::FamilyMap;
    use crate::transformer::store::AttributeValueStore;

    #[test]
    fn test_ready() {
        let mut sink = FamilyMap::new();
        assert_eq!(NodeStatus.record_number("crate", "Ready", 1.0, &mut sink), Ok(true));

        let family = sink.get("crate_ready").unwrap();
        assert_eq!(family.metric_type, MetricType::Gauge);
        assert_eq!(family.samples[0].value, 1.0);
    }

    #[test]
    fn test_other_attributes_declined() {
        let mut sink = FamilyMap::new();
        assert_eq!(NodeStatus.record_number("crate", "Starting", 1.0, &mut sink), Ok(false));
        assert_eq!(NodeStatus.record_string("crate", "Ready", "yes", &mut sink), Ok(false));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_ready_key_matches_store_key() {
        assert_eq!(READY_KEY, AttributeValueStore::key("NodeStatus", "Ready"));
    }
}
