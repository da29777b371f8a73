//! Query sessions bound to a source collection.

use serde_json::Value;

use crate::collection::Collection;
use crate::error::Result;
use crate::post::UniqueBy;
use crate::query::Query;
use crate::term::Arg;
use crate::value::Number;

/// A [`Query`] paired with the collection it runs against.
///
/// Builder calls take and return the session by value. Every terminal
/// accessor resolves the accumulated query afresh, so calling them
/// repeatedly is safe.
///
/// # Example
///
/// ```
/// use recset::{args, Arg, Collection};
/// use serde_json::json;
///
/// let orders = Collection::from_value(json!([
///     {"id": 1, "status": "open", "total": 40},
///     {"id": 2, "status": "paid", "total": 15},
///     {"id": 3, "status": "open", "total": 5},
/// ]))
/// .unwrap();
///
/// let open = orders.query().and_where([Arg::eq("status", "open")]);
/// assert_eq!(open.count().unwrap(), 2);
/// assert_eq!(open.sum(Some("total")).unwrap(), recset::Number::I64(45));
///
/// let big = orders.query().and_where(args!["total", ">=", 15]);
/// assert_eq!(big.pluck("id", None).unwrap().to_value(), json!([1, 2]));
/// ```
#[derive(Debug, Clone)]
pub struct Session<'a> {
    source: &'a Collection,
    query: Query,
}

impl<'a> Session<'a> {
    /// Starts an empty session over `source`.
    pub fn new(source: &'a Collection) -> Self {
        Session {
            source,
            query: Query::new(),
        }
    }

    /// Adds an AND group; see [`Query::and_where`].
    pub fn and_where(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.query = self.query.and_where(args);
        self
    }

    /// Adds an OR group; see [`Query::or_where`].
    pub fn or_where(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.query = self.query.or_where(args);
        self
    }

    /// The accumulated query.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The collection this session reads from.
    pub fn source(&self) -> &'a Collection {
        self.source
    }

    /// Resolves the accumulated groups against the source.
    pub fn get(&self) -> Result<Collection> {
        self.query.resolve(self.source)
    }

    /// Buckets the matching records by `field`.
    pub fn group_by(&self, field: &str) -> Result<Collection> {
        self.get()?.group_by(field)
    }

    /// Matching records with duplicates removed.
    pub fn unique(&self, by: UniqueBy) -> Result<Collection> {
        self.get()?.unique(by)
    }

    /// Number of distinct matching records.
    pub fn unique_count(&self) -> Result<usize> {
        self.get()?.unique_count()
    }

    /// Extracts `field` from every matching record.
    pub fn pluck(&self, field: &str, index_field: Option<&str>) -> Result<Collection> {
        Ok(self.get()?.pluck(field, index_field))
    }

    /// Folds the matching records from left to right.
    pub fn reduce<A, F>(&self, initial: A, f: F) -> Result<A>
    where
        F: FnMut(A, &Value) -> A,
    {
        Ok(self.get()?.reduce(initial, f))
    }

    /// Sum over the matching records.
    pub fn sum(&self, field: Option<&str>) -> Result<Number> {
        Ok(self.get()?.sum(field))
    }

    /// Smallest value among the matching records.
    pub fn min(&self, field: Option<&str>) -> Result<Option<Value>> {
        Ok(self.get()?.min(field))
    }

    /// Largest value among the matching records.
    pub fn max(&self, field: Option<&str>) -> Result<Option<Value>> {
        Ok(self.get()?.max(field))
    }

    /// Mean over the matching records.
    pub fn average(&self, field: Option<&str>) -> Result<Option<f64>> {
        Ok(self.get()?.average(field))
    }

    /// Number of matching records.
    pub fn count(&self) -> Result<usize> {
        Ok(self.get()?.len())
    }
}
