//! Ordered, keyed record container.
//!
//! A [`Collection`] maps [`Key`]s to JSON values while remembering insertion
//! order. Querying never mutates a collection: every transform returns a new
//! one, and filtered views keep the keys their records had in the source.

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{QueryError, Result};
use crate::post::{self, UniqueBy};
use crate::session::Session;
use crate::value::{self, Number};

/// Key of a collection entry.
///
/// Names that are the canonical decimal form of a non-negative integer
/// (`"0"`, `"17"`, but not `"07"` or `"-1"`) are stored as [`Key::Index`].
/// Integers beyond `i64::MAX` stay names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Positional key.
    Index(usize),
    /// Associative key.
    Name(String),
}

impl Key {
    /// Builds a key from text, normalizing canonical integers to indexes.
    pub fn parse(s: &str) -> Key {
        let canonical = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit())
            && (s == "0" || !s.starts_with('0'));
        match s.parse::<i64>().ok().and_then(|i| usize::try_from(i).ok()) {
            Some(i) if canonical => Key::Index(i),
            _ => Key::Name(s.to_string()),
        }
    }

    /// Returns the positional index, if this is one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::parse(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::parse(&s)
    }
}

/// An ordered collection of records.
///
/// # Example
///
/// ```
/// use recset::Collection;
/// use serde_json::json;
///
/// let people = Collection::from_value(json!([
///     {"name": "Ada", "age": 36},
///     {"name": "Linus", "age": 17},
/// ]))
/// .unwrap();
///
/// assert_eq!(people.len(), 2);
/// assert_eq!(people[1]["name"], "Linus");
/// assert_eq!(people.sum(Some("age")), recset::Number::I64(53));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Collection {
    entries: IndexMap<Key, Value>,
    next_index: usize,
}

impl Collection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Collection::default()
    }

    /// Builds a collection from a plain structure.
    ///
    /// Arrays become positional entries; objects keep their keys.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut collection = Collection::new();
        match value {
            Value::Array(items) => collection.extend(items),
            Value::Object(map) => {
                for (name, item) in map {
                    collection.insert(Key::parse(&name), item);
                }
            }
            other => {
                return Err(QueryError::NotAContainer {
                    actual: value::kind_name(&other),
                })
            }
        }
        Ok(collection)
    }

    /// Parses a JSON document into a collection.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Collection::from_value(serde_json::from_str(s)?)
    }

    /// Parses a YAML document into a collection.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Collection::from_value(serde_yaml::from_str(s)?)
    }

    /// Snapshots the collection as a plain structure.
    ///
    /// Keys `0..len` in order produce an array; anything else an object.
    pub fn to_value(&self) -> Value {
        let is_list = self
            .entries
            .keys()
            .enumerate()
            .all(|(position, key)| key.as_index() == Some(position));
        if is_list {
            Value::Array(self.entries.values().cloned().collect())
        } else {
            let map: Map<String, Value> = self
                .entries
                .iter()
                .map(|(key, item)| (key.to_string(), item.clone()))
                .collect();
            Value::Object(map)
        }
    }

    /// Starts a query session over this collection.
    pub fn query(&self) -> Session<'_> {
        Session::new(self)
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries (alias of [`len`](Self::len)).
    pub fn count(&self) -> usize {
        self.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by key.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Sets the value under `key`, returning the previous value.
    ///
    /// New keys go to the end; existing keys keep their position.
    pub fn insert(&mut self, key: impl Into<Key>, value: Value) -> Option<Value> {
        let key = key.into();
        if let Key::Index(i) = key {
            self.next_index = self.next_index.max(i.saturating_add(1));
        }
        self.entries.insert(key, value)
    }

    /// Appends a value under the next free positional key.
    ///
    /// Once `usize::MAX` is in use there is no free key left, and appends
    /// replace that entry.
    pub fn append(&mut self, value: impl Into<Value>) -> Key {
        let key = Key::Index(self.next_index);
        self.insert(key.clone(), value.into());
        key
    }

    /// Iterates over `(key, value)` pairs in order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.entries.iter()
    }

    /// Iterates over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    /// Iterates over values in order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Applies `f` to every entry, keeping keys.
    pub fn map<F>(&self, mut f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> Value,
    {
        self.iter()
            .map(|(key, item)| (key.clone(), f(item, key)))
            .collect()
    }

    /// Keeps the entries for which `f` returns `true`, keeping keys.
    pub fn filter<F>(&self, mut f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.iter()
            .filter(|(key, item)| f(item, key))
            .map(|(key, item)| (key.clone(), item.clone()))
            .collect()
    }

    /// Finds the key of the first value loosely equal to `needle`.
    pub fn search(&self, needle: &Value) -> Option<&Key> {
        self.iter()
            .find(|(_, item)| value::loose_eq(item, needle))
            .map(|(key, _)| key)
    }

    /// Extracts one field from every record that has it.
    ///
    /// Both field names accept dotted paths (`"owner.name"`). With
    /// `index_field`, each plucked value is keyed by the text of that field
    /// on the same record; records without it are appended instead.
    pub fn pluck(&self, field: &str, index_field: Option<&str>) -> Collection {
        let mut plucked = Collection::new();
        for record in self.values() {
            let Some(item) = value::lookup(record, field) else {
                continue;
            };
            match index_field.and_then(|path| value::lookup(record, path)) {
                Some(index) if !value::is_nested(index) => {
                    plucked.insert(Key::parse(&value::text(index)), item.clone());
                }
                _ => {
                    plucked.append(item.clone());
                }
            }
        }
        plucked
    }

    /// Folds the values from left to right.
    pub fn reduce<A, F>(&self, initial: A, f: F) -> A
    where
        F: FnMut(A, &Value) -> A,
    {
        self.values().fold(initial, f)
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    fn operands(&self, field: Option<&str>) -> Vec<Value> {
        match field {
            Some(field) => self.pluck(field, None).values().cloned().collect(),
            None => self.values().cloned().collect(),
        }
    }

    /// Sums numbers and numeric strings; other values count as zero.
    pub fn sum(&self, field: Option<&str>) -> Number {
        self.operands(field)
            .iter()
            .filter_map(Number::from_value)
            .fold(Number::I64(0), |total, n| total + n)
    }

    /// Smallest value, or `None` when there is nothing to compare.
    pub fn min(&self, field: Option<&str>) -> Option<Value> {
        self.extreme(field, std::cmp::Ordering::Less)
    }

    /// Largest value, or `None` when there is nothing to compare.
    pub fn max(&self, field: Option<&str>) -> Option<Value> {
        self.extreme(field, std::cmp::Ordering::Greater)
    }

    fn extreme(&self, field: Option<&str>, wanted: std::cmp::Ordering) -> Option<Value> {
        self.operands(field).into_iter().reduce(|best, candidate| {
            if value::compare_values(&candidate, &best) == Some(wanted) {
                candidate
            } else {
                best
            }
        })
    }

    /// Arithmetic mean of [`sum`](Self::sum) over the operand count.
    pub fn average(&self, field: Option<&str>) -> Option<f64> {
        let count = self.operands(field).len();
        if count == 0 {
            return None;
        }
        Some(self.sum(field).to_f64() / count as f64)
    }

    // ========================================================================
    // Post-processing
    // ========================================================================

    /// Removes duplicates by serialized form; see [`post::unique`].
    pub fn unique(&self, by: UniqueBy) -> Result<Collection> {
        post::unique(self, by)
    }

    /// Number of distinct serialized values.
    pub fn unique_count(&self) -> Result<usize> {
        Ok(self.unique(UniqueBy::default())?.len())
    }

    /// Buckets records by the value of `field`; see [`post::group_by`].
    pub fn group_by(&self, field: &str) -> Result<Collection> {
        post::group_by(self, field)
    }
}

impl PartialEq for Collection {
    /// Collections are equal when they hold the same entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut collection = Collection::new();
        collection.extend(iter);
        collection
    }
}

impl FromIterator<(Key, Value)> for Collection {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for (key, item) in iter {
            collection.insert(key, item);
        }
        collection
    }
}

impl Extend<Value> for Collection {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        for item in iter {
            self.append(item);
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Index<usize> for Collection {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if there is no entry under the positional key.
    fn index(&self, index: usize) -> &Value {
        match self.entries.get(&Key::Index(index)) {
            Some(item) => item,
            None => panic!("no entry at index {index}"),
        }
    }
}

impl Index<&str> for Collection {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if there is no entry under the key.
    fn index(&self, name: &str) -> &Value {
        match self.entries.get(&Key::parse(name)) {
            Some(item) => item,
            None => panic!("no entry under key '{name}'"),
        }
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let plain = Value::deserialize(deserializer)?;
        Collection::from_value(plain).map_err(serde::de::Error::custom)
    }
}
