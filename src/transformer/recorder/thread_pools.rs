//! `type=ThreadPools` recorder
//!
//! Every attribute is a composite record describing one pool.

use super::{record_named_composite, RecordResult, Recorder};
use crate::collector::{CompositeRecord, ValueKind};
use crate::error::RecorderError;
use crate::transformer::model::SampleSink;

const HELP: &str = "Statistics of thread pools";

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPools;

impl Recorder for ThreadPools {
    fn kind(&self) -> &'static str {
        "ThreadPools"
    }

    fn record_number(
        &mut self,
        _domain: &str,
        attr_name: &str,
        _value: f64,
        _sink: &mut dyn SampleSink,
    ) -> RecordResult {
        Err(RecorderError::unsupported(self.kind(), ValueKind::Number, attr_name))
    }

    fn record_string(
        &mut self,
        _domain: &str,
        attr_name: &str,
        _value: &str,
        _sink: &mut dyn SampleSink,
    ) -> RecordResult {
        Err(RecorderError::unsupported(self.kind(), ValueKind::String, attr_name))
    }

    fn record_composite(
        &mut self,
        domain: &str,
        _attr_name: &str,
        value: &CompositeRecord,
        sink: &mut dyn SampleSink,
    ) -> RecordResult {
        Ok(record_named_composite(
            &format!("{}_threadpools", domain),
            HELP,
            value,
            sink,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::AttributeValue;
    use crate::transformer::model::{FamilyMap, MetricType};

    fn pool(name: &str) -> CompositeRecord {
        CompositeRecord::from([
            ("active".to_string(), AttributeValue::Number(1.0)),
            ("completed".to_string(), AttributeValue::Number(17.0)),
            ("largestPoolSize".to_string(), AttributeValue::Number(4.0)),
            ("name".to_string(), AttributeValue::String(name.to_string())),
            ("poolSize".to_string(), AttributeValue::Number(4.0)),
            ("queueSize".to_string(), AttributeValue::Number(0.0)),
            ("rejected".to_string(), AttributeValue::Number(0.0)),
        ])
    }

    #[test]
    fn test_pool_fields_become_properties() {
        let mut sink = FamilyMap::new();
        assert_eq!(
            ThreadPools.record_composite("crate", "Search", &pool("Search"), &mut sink),
            Ok(true)
        );

        let family = sink.get("crate_threadpools").unwrap();
        assert_eq!(family.metric_type, MetricType::Gauge);
        assert_eq!(family.help, "Statistics of thread pools");
        assert_eq!(family.samples.len(), 6);
        assert!(family.samples.iter().all(|s| s.label("name") == Some("search")));

        let completed = family
            .samples
            .iter()
            .find(|s| s.label("property") == Some("completed"))
            .unwrap();
        assert_eq!(completed.value, 17.0);
    }

    #[test]
    fn test_scalar_values_are_contract_violations() {
        let mut sink = FamilyMap::new();
        assert_eq!(
            ThreadPools.record_number("crate", "Generic", 1.0, &mut sink),
            Err(RecorderError::unsupported("ThreadPools", ValueKind::Number, "Generic"))
        );
        assert!(ThreadPools
            .record_string("crate", "Generic", "x", &mut sink)
            .is_err());
        assert!(ThreadPools
            .record_composite_array("crate", "Generic", &[], &mut sink)
            .is_err());
    }
}
