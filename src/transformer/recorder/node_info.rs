//! `type=NodeInfo` recorder
//!
//! The node id and name arrive as two separate string attributes; they are
//! accumulated and emitted as a single info sample once both are known.
//! Shard statistics and the per-shard info table share the `node` family.

use super::{RecordResult, Recorder};
use crate::collector::{AttributeValue, CompositeRecord};
use crate::transformer::model::{MetricSample, MetricType, SampleSink};

const NODE_INFO_HELP: &str = "Node information.";
const CLUSTER_STATE_VERSION_HELP: &str = "The current version of the cluster state.";
const NODE_HELP: &str = "Shard statistics and per-shard information of the node.";

/// Composite fields of a `ShardInfo` record rendered as labels
const SHARD_LABEL_FIELDS: [(&str, &str); 5] = [
    ("shardId", "id"),
    ("schema", "schema"),
    ("table", "table"),
    ("partitionIdent", "partition_ident"),
    ("primary", "primary"),
];

#[derive(Debug, Default)]
pub struct NodeInfo {
    node_id: Option<String>,
    node_name: Option<String>,
    emitted: bool,
}

impl NodeInfo {
    fn emit_info_if_complete(&mut self, domain: &str, sink: &mut dyn SampleSink) {
        if self.emitted {
            return;
        }
        let (Some(id), Some(name)) = (&self.node_id, &self.node_name) else {
            return;
        };

        sink.accept(
            MetricSample::new(format!("{}_node_info", domain), 1.0)
                .with_label("id", id.as_str())
                .with_label("name", name.as_str()),
            MetricType::Untyped,
            NODE_INFO_HELP,
        );
        self.emitted = true;
    }
}

fn label_value(record: &CompositeRecord, field: &str) -> String {
    record
        .get(field)
        .and_then(AttributeValue::to_label_value)
        .unwrap_or_default()
}

impl Recorder for NodeInfo {
    fn kind(&self) -> &'static str {
        "NodeInfo"
    }

    fn record_number(
        &mut self,
        domain: &str,
        attr_name: &str,
        value: f64,
        sink: &mut dyn SampleSink,
    ) -> RecordResult {
        if attr_name != "ClusterStateVersion" {
            return Ok(false);
        }

        sink.accept(
            MetricSample::new(format!("{}_cluster_state_version", domain), value),
            MetricType::Gauge,
            CLUSTER_STATE_VERSION_HELP,
        );
        Ok(true)
    }

    fn record_string(
        &mut self,
        domain: &str,
        attr_name: &str,
        value: &str,
        sink: &mut dyn SampleSink,
    ) -> RecordResult {
        if attr_name.eq_ignore_ascii_case("NodeId") {
            self.node_id = Some(value.to_string());
        } else if attr_name.eq_ignore_ascii_case("NodeName") {
            self.node_name = Some(value.to_string());
        } else {
            return Ok(false);
        }

        self.emit_info_if_complete(domain, sink);
        Ok(true)
    }

    fn record_composite(
        &mut self,
        domain: &str,
        attr_name: &str,
        value: &CompositeRecord,
        sink: &mut dyn SampleSink,
    ) -> RecordResult {
        if attr_name != "ShardStats" {
            return Ok(false);
        }

        let metric_name = format!("{}_node", domain);
        for (property, field) in value {
            let Some(number) = field.as_f64() else {
                continue;
            };
            sink.accept(
                MetricSample::new(metric_name.as_str(), number)
                    .with_label("name", "shard_stats")
                    .with_label("property", property.as_str()),
                MetricType::Gauge,
                NODE_HELP,
            );
        }
        Ok(true)
    }

    fn record_composite_array(
        &mut self,
        domain: &str,
        attr_name: &str,
        value: &[CompositeRecord],
        sink: &mut dyn SampleSink,
    ) -> RecordResult {
        if attr_name != "ShardInfo" {
            return Ok(false);
        }

        let metric_name = format!("{}_node", domain);
        for shard in value {
            let labels: Vec<(&str, String)> = SHARD_LABEL_FIELDS
                .iter()
                .map(|(field, label)| (*label, label_value(shard, field)))
                .collect();

            for (property, field) in shard {
                if SHARD_LABEL_FIELDS.iter().any(|(f, _)| f == property) {
                    continue;
                }
                let Some(number) = field.as_f64() else {
                    continue;
                };

                let sample = labels.iter().fold(
                    MetricSample::new(metric_name.as_str(), number)
                        .with_label("name", "shard_info")
                        .with_label("property", property.as_str()),
                    |sample, (label, value)| sample.with_label(label, value.as_str()),
                );
                sink.accept(sample, MetricType::Gauge, NODE_HELP);
            }
        }
        Ok(true)
    }

    fn reset(&mut self) {
        self.node_id = None;
        self.node_name = None;
        self.emitted = false;
    }
}
