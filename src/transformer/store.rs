//! Attribute value side channel
//!
//! Records the last seen value of every processed attribute under
//! `<primaryProperty>_<attributeName>`, independent of metric emission.
//! Shared between translation passes and the readiness endpoint.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::collector::AttributeValue;

/// Thread-safe key/value store of attribute values
#[derive(Debug, Default)]
pub struct AttributeValueStore {
    values: RwLock<HashMap<String, AttributeValue>>,
}

impl AttributeValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store key for an attribute of an object
    pub fn key(primary_property: &str, attribute: &str) -> String {
        format!("{}_{}", primary_property, attribute)
    }

    pub fn put(&self, key: impl Into<String>, value: AttributeValue) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<AttributeValue> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    /// Remove all stored values
    pub fn reset(&self) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
