//! Managed object registry 경계 모듈
//!
//! 번역 엔진은 registry를 `resolve` / `describe` / `read` 세 가지 연산으로만 사용합니다.
//! 실제 데이터는 CrateDB 프로세스에 붙은 Jolokia 에이전트에서 snapshot으로 가져옵니다.
//!
//! # Example
//!
//! ```ignore
//! use crate_jmx_exporter::collector::{JolokiaClient, ObjectNamePattern};
//!
//! let client = JolokiaClient::new("http://localhost:8778/jolokia", 5000)?;
//! let pattern = ObjectNamePattern::parse("io.crate.monitoring:*")?;
//! let snapshot = client.snapshot(&pattern).await?;
//! ```

mod client;
mod object_name;
mod parser;
mod snapshot;
mod value;

pub use client::JolokiaClient;
pub use object_name::{ObjectName, ObjectNamePattern};
pub use parser::{
    attribute_value_from_json, parse_bulk_response, parse_list_value, parse_read_value,
    parse_response, parse_search_value, CollectResult, JolokiaResponse, RequestInfo,
};
pub use snapshot::{RegistrySnapshot, SnapshotObject};
pub use value::{AttributeValue, CompositeRecord, ValueKind};

use crate::error::RegistryError;

/// Attribute 메타데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    /// Attribute 이름 (예: "SelectQueryTotalCount")
    pub name: String,
    /// 선언된 타입 (예: "long", "javax.management.openmbean.CompositeData")
    pub declared_type: String,
    /// 설명
    pub description: String,
    /// 읽기 가능 여부
    pub readable: bool,
}

impl AttributeDescriptor {
    /// Readable descriptor with an empty description
    pub fn new(name: &str, declared_type: &str) -> Self {
        Self {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            description: String::new(),
            readable: true,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Mark the attribute as not readable
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }
}

/// The host process's managed object registry, as seen by the translation engine
///
/// All operations are synchronous; each may fail independently.
pub trait ManagedObjectRegistry {
    /// Resolve a name pattern to the set of matching objects (order not guaranteed)
    fn resolve(&self, pattern: &ObjectNamePattern) -> Result<Vec<ObjectName>, RegistryError>;

    /// List the attribute descriptors of one object
    fn describe(&self, object: &ObjectName) -> Result<Vec<AttributeDescriptor>, RegistryError>;

    /// Read the current value of one attribute
    fn read(&self, object: &ObjectName, attribute: &str) -> Result<AttributeValue, RegistryError>;
}

/// Where snapshots come from: a live Jolokia agent or a fixed in-memory registry
#[derive(Clone)]
pub enum RegistrySource {
    Jolokia(JolokiaClient),
    Static(RegistrySnapshot),
}

impl RegistrySource {
    /// Fetch a snapshot for this pass
    ///
    /// A failed fetch yields an unavailable snapshot, so the pass still runs
    /// and reports the failure at resolution time.
    pub async fn snapshot(&self, pattern: &ObjectNamePattern) -> RegistrySnapshot {
        match self {
            RegistrySource::Jolokia(client) => match client.snapshot(pattern).await {
                Ok(snapshot) => snapshot,
                Err(e) => RegistrySnapshot::unavailable(e.to_string()),
            },
            RegistrySource::Static(snapshot) => snapshot.clone(),
        }
    }
}
