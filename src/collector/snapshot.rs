//! In-memory registry snapshot
//!
//! A snapshot captures the objects, descriptors and values of one scrape so the
//! translation pass can run synchronously against it.

use serde_json::Value;
use std::collections::HashMap;

use super::object_name::{ObjectName, ObjectNamePattern};
use super::parser::{attribute_value_from_json, is_read_fault};
use super::value::AttributeValue;
use super::{AttributeDescriptor, ManagedObjectRegistry};
use crate::error::RegistryError;

/// Registry state captured for one pass
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    objects: Vec<SnapshotObject>,
    unavailable: Option<String>,
}

/// One object of a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotObject {
    name: ObjectName,
    descriptors: Option<Vec<AttributeDescriptor>>,
    values: HashMap<String, AttributeValue>,
}

impl RegistrySnapshot {
    /// Empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a registry that could not be reached; every resolve fails
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            objects: Vec::new(),
            unavailable: Some(reason.into()),
        }
    }

    /// Add an object and return it for attribute setup
    pub fn add_object(&mut self, name: ObjectName) -> &mut SnapshotObject {
        self.objects.push(SnapshotObject {
            name,
            descriptors: Some(Vec::new()),
            values: HashMap::new(),
        });
        let last = self.objects.len() - 1;
        &mut self.objects[last]
    }

    /// Number of objects in the snapshot
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the snapshot holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Assemble a snapshot from Jolokia search, list and read results
    pub(crate) fn assemble(
        names: Vec<ObjectName>,
        listed: Vec<(ObjectName, Vec<AttributeDescriptor>)>,
        read: Vec<(ObjectName, HashMap<String, Value>)>,
    ) -> Self {
        let mut snapshot = Self::new();

        for name in names {
            let descriptors = listed
                .iter()
                .find(|(n, _)| same_object(n, &name))
                .map(|(_, d)| d.clone());
            let raw_values = read
                .iter()
                .find(|(n, _)| same_object(n, &name))
                .map(|(_, v)| v);

            let mut values = HashMap::new();
            if let (Some(descriptors), Some(raw_values)) = (&descriptors, raw_values) {
                for descriptor in descriptors {
                    if let Some(raw) = raw_values.get(&descriptor.name) {
                        if is_read_fault(raw, &descriptor.declared_type) {
                            tracing::debug!(
                                mbean = %name,
                                attribute = %descriptor.name,
                                fault = %raw,
                                "Attribute getter failed"
                            );
                            continue;
                        }
                        values.insert(
                            descriptor.name.clone(),
                            attribute_value_from_json(raw, &descriptor.declared_type),
                        );
                    }
                }
            }

            snapshot.objects.push(SnapshotObject {
                name,
                descriptors,
                values,
            });
        }

        snapshot
    }

    fn find(&self, object: &ObjectName) -> Option<&SnapshotObject> {
        self.objects.iter().find(|o| same_object(&o.name, object))
    }
}

impl SnapshotObject {
    /// Add a readable attribute with its current value
    pub fn attribute(&mut self, descriptor: AttributeDescriptor, value: AttributeValue) -> &mut Self {
        self.values.insert(descriptor.name.clone(), value);
        self.descriptors.get_or_insert_with(Vec::new).push(descriptor);
        self
    }

    /// Add a descriptor whose value read will fail
    pub fn failing_attribute(&mut self, descriptor: AttributeDescriptor) -> &mut Self {
        self.descriptors.get_or_insert_with(Vec::new).push(descriptor);
        self
    }

    /// Make descriptor retrieval fail for this object
    pub fn without_descriptors(&mut self) -> &mut Self {
        self.descriptors = None;
        self
    }

    /// Object name
    pub fn name(&self) -> &ObjectName {
        &self.name
    }
}

impl ManagedObjectRegistry for RegistrySnapshot {
    fn resolve(&self, pattern: &ObjectNamePattern) -> Result<Vec<ObjectName>, RegistryError> {
        if let Some(reason) = &self.unavailable {
            return Err(RegistryError::Unavailable(reason.clone()));
        }

        Ok(self
            .objects
            .iter()
            .filter(|o| pattern.matches(&o.name))
            .map(|o| o.name.clone())
            .collect())
    }

    fn describe(&self, object: &ObjectName) -> Result<Vec<AttributeDescriptor>, RegistryError> {
        self.find(object)
            .and_then(|o| o.descriptors.clone())
            .ok_or_else(|| RegistryError::InstanceNotFound(object.to_string()))
    }

    fn read(&self, object: &ObjectName, attribute: &str) -> Result<AttributeValue, RegistryError> {
        self.find(object)
            .and_then(|o| o.values.get(attribute).cloned())
            .ok_or_else(|| RegistryError::AttributeUnavailable {
                object: object.to_string(),
                attribute: attribute.to_string(),
            })
    }
}

/// Same domain and same key properties, ignoring property order
///
/// Jolokia lists objects under their canonical (sorted) key property list.
fn same_object(a: &ObjectName, b: &ObjectName) -> bool {
    if a.domain != b.domain || a.properties.len() != b.properties.len() {
        return false;
    }
    a.properties
        .iter()
        .all(|(k, v)| b.property(k) == Some(v.as_str()))
}
