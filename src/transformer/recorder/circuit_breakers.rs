//! `type=CircuitBreakers` recorder

use super::{record_named_composite, RecordResult, Recorder};
use crate::collector::{CompositeRecord, ValueKind};
use crate::error::RecorderError;
use crate::transformer::model::SampleSink;

const HELP: &str = "Statistics of circuit breakers";

#[derive(Debug, Default, Clone, Copy)]
pub struct CircuitBreakers;

impl Recorder for CircuitBreakers {
    fn kind(&self) -> &'static str {
        "CircuitBreakers"
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
            &format!("{}_circuitbreakers", domain),
            HELP,
            value,
            sink,
        ))
    }
}
