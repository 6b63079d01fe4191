//! `type=Connections` recorder
//!
//! `<Protocol><Property>` attributes, e.g. `HttpOpen` or `PsqlBytesSent`,
//! become one `connections` family labeled by protocol and property.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{RecordResult, Recorder};
use crate::transformer::model::{MetricSample, MetricType, SampleSink};

static CONNECTIONS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<protocol>Psql|Http|Transport)(?P<property>Open|Total|MessagesReceived|BytesReceived|MessagesSent|BytesSent)$",
    )
    .expect("invalid connections regex")
});

const HELP: &str = "Number of connections and transferred messages and bytes per protocol";

#[derive(Debug, Default, Clone, Copy)]
pub struct Connections;

impl Recorder for Connections {
    fn kind(&self) -> &'static str {
        "Connections"
    }

    fn record_number(
        &mut self,
        domain: &str,
        attr_name: &str,
        value: f64,
        sink: &mut dyn SampleSink,
    ) -> RecordResult {
        let Some(caps) = CONNECTIONS_PATTERN.captures(attr_name) else {
            return Ok(false);
        };

        sink.accept(
            MetricSample::new(format!("{}_connections", domain), value)
                .with_label("protocol", caps["protocol"].to_lowercase())
                .with_label("property", caps["property"].to_lowercase()),
            MetricType::Gauge,
            HELP,
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
