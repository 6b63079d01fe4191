//! `type=QueryStats` recorder
//!
//! Attribute names follow `<QueryType>Query<Suffix>`, e.g. `SelectQueryFrequency`
//! or `OverallQuerySumOfDurations`. The query type becomes the `query` label,
//! the suffix selects the metric.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{RecordResult, Recorder};
use crate::transformer::model::{MetricSample, MetricType, SampleSink};

/// One suffix and the metric it maps to
struct QueryMetric {
    suffix: &'static str,
    metric: &'static str,
    help: &'static str,
}

/// Ordered by suffix length, longest first. A suffix that ends with another
/// suffix must be tried before it.
const QUERY_METRICS: [QueryMetric; 6] = [
    QueryMetric {
        suffix: "AffectedRowCount",
        metric: "query_affected_row_count",
        help: "The total number of affected rows of all statement executions for a given query type.",
    },
    QueryMetric {
        suffix: "AverageDuration",
        metric: "query_duration_seconds",
        help: "The average query duration for a given query type.",
    },
    QueryMetric {
        suffix: "SumOfDurations",
        metric: "query_sum_of_durations_millis",
        help: "The sum of durations of all executed queries of a given type, expressed in milliseconds.",
    },
    QueryMetric {
        suffix: "FailedCount",
        metric: "query_failed_count",
        help: "The total number of queries that failed to complete successfully for a given query type.",
    },
    QueryMetric {
        suffix: "TotalCount",
        metric: "query_total_count",
        help: "The total number of queries that were executed for a given query type.",
    },
    QueryMetric {
        suffix: "Frequency",
        metric: "queries",
        help: "Queries per second for a given query type.",
    },
];

static QUERY_PATTERNS: Lazy<Vec<(Regex, &'static QueryMetric)>> = Lazy::new(|| {
    QUERY_METRICS
        .iter()
        .map(|m| {
            let pattern = format!(r"^(?P<query>.+)Query{}$", m.suffix);
            (
                Regex::new(&pattern).expect("invalid query stats regex"),
                m,
            )
        })
        .collect()
});

/// Split an attribute name into `(query type, metric)`
fn decompose(attr_name: &str) -> Option<(&str, &'static QueryMetric)> {
    QUERY_PATTERNS.iter().find_map(|(regex, metric)| {
        regex
            .captures(attr_name)
            .and_then(|caps| caps.name("query"))
            .map(|query| (query.as_str(), *metric))
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryStats;

impl Recorder for QueryStats {
    fn kind(&self) -> &'static str {
        "QueryStats"
    }

    fn record_number(
        &mut self,
        domain: &str,
        attr_name: &str,
        value: f64,
        sink: &mut dyn SampleSink,
    ) -> RecordResult {
        let Some((query, metric)) = decompose(attr_name) else {
            return Ok(false);
        };

        sink.accept(
            MetricSample::new(format!("{}_{}", domain, metric.metric), value)
                .with_label("query", query),
            MetricType::Gauge,
            metric.help,
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
