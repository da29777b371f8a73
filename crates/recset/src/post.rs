//! Post-processing of resolved collections.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::collection::{Collection, Key};
use crate::error::{QueryError, Result};
use crate::value;

/// How [`unique`] decides that two values are duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UniqueBy {
    /// Compare the serialized JSON text as is. Object key order matters.
    #[default]
    Serialized,
    /// Sort object keys recursively before serializing.
    Canonical,
}

/// Removes duplicate values, keeping the first occurrence of each.
///
/// Survivors keep the keys they had in `collection`.
pub fn unique(collection: &Collection, by: UniqueBy) -> Result<Collection> {
    let mut seen = HashSet::new();
    let mut survivors = Collection::new();
    for (key, item) in collection {
        let serialized = match by {
            UniqueBy::Serialized => serde_json::to_string(item)?,
            UniqueBy::Canonical => serde_json::to_string(&canonical(item))?,
        };
        if seen.insert(serialized) {
            survivors.insert(key.clone(), item.clone());
        }
    }
    Ok(survivors)
}

fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(name, item)| (name.clone(), canonical(item)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

/// Buckets records by the value of `field`.
///
/// Each bucket is an array of records in first-seen order. Bucket keys are
/// the text of the field value; canonical non-negative integers become
/// positional keys.
pub fn group_by(collection: &Collection, field: &str) -> Result<Collection> {
    let mut buckets: IndexMap<Key, Vec<Value>> = IndexMap::new();
    for record in collection.values() {
        let group = record
            .as_object()
            .and_then(|map| map.get(field))
            .ok_or_else(|| QueryError::field_not_found(field))?;
        if value::is_nested(group) {
            return Err(QueryError::InvalidGroupKey {
                field: field.to_string(),
            });
        }
        buckets
            .entry(Key::parse(&value::text(group)))
            .or_default()
            .push(record.clone());
    }
    Ok(buckets
        .into_iter()
        .map(|(key, records)| (key, Value::Array(records)))
        .collect())
}
