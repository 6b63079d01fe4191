//! Metric translation module
//!
//! Turns the attributes of CrateDB's MBeans into Prometheus metric families.
//!
//! - [`naming`]: metric name normalization
//! - [`store`]: side channel of last seen attribute values
//! - [`model`]: samples, families and the per-pass family map
//! - [`recorder`]: per-kind recorders and their registry
//! - [`engine`]: the translation pass and the generic fallback path
//! - [`formatter`]: text exposition output

pub mod engine;
pub mod formatter;
pub mod model;
pub mod naming;
pub mod recorder;
pub mod store;

pub use engine::{EngineSettings, PassStats, TranslationEngine};
pub use formatter::{PrometheusFormatter, CONTENT_TYPE};
pub use model::{FamilyMap, MetricFamily, MetricSample, MetricType, SampleSink};
pub use recorder::{Recorder, RecorderRegistry, READY_KEY};
pub use store::AttributeValueStore;
