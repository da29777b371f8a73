//! Query builder and resolver.
//!
//! The [`Query`] struct accumulates condition groups through a fluent builder
//! API and resolves them against a [`Collection`].

use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::collection::{Collection, Key};
use crate::error::Result;
use crate::eval::evaluate_group;
use crate::normalize::normalize;
use crate::term::{Arg, Combinator, ConditionGroup, Term};

/// An accumulated set of condition groups.
///
/// Each `and_where`/`or_where` call contributes one group. Groups are not
/// chained: resolution evaluates every group against the full source and
/// returns the union of the records that pass any of them.
///
/// ```text
/// result = records passing group 1 ∪ records passing group 2 ∪ ...
/// ```
///
/// # Example
///
/// ```
/// use recset::{args, Arg, Collection, Query};
/// use serde_json::json;
///
/// let people = Collection::from_value(json!([
///     {"name": "Ada", "age": 36},
///     {"name": "Linus", "age": 17},
///     {"name": "Grace", "age": 85},
/// ]))
/// .unwrap();
///
/// let query = Query::new()
///     .and_where(args!["age", "<", 18])
///     .or_where([Arg::eq("name", "Grace")]);
///
/// let found = query.resolve(&people).unwrap();
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0]["name"], "Linus");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    groups: Vec<ConditionGroup>,
}

impl Query {
    /// Creates a new empty query.
    ///
    /// An empty query resolves to a copy of its source.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Adds a group whose terms must all hold.
    pub fn and_where(self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.push(Combinator::And, args)
    }

    /// Adds a group of which at least one term must hold.
    pub fn or_where(self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.push(Combinator::Or, args)
    }

    fn push(mut self, combinator: Combinator, args: impl IntoIterator<Item = Arg>) -> Self {
        let args: Vec<Arg> = args.into_iter().collect();
        if !args.is_empty() {
            self.groups
                .push(ConditionGroup::new(combinator, normalize(args)));
        }
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the groups in call order.
    pub fn groups(&self) -> &[ConditionGroup] {
        &self.groups
    }

    /// Returns the groups of one combinator, in call order.
    pub fn groups_for(&self, combinator: Combinator) -> impl Iterator<Item = &ConditionGroup> {
        self.groups
            .iter()
            .filter(move |group| group.combinator == combinator)
    }

    /// Returns `true` if no group has been added.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Resolves the query against `source`.
    ///
    /// Matching records are collected in the order their keys were first
    /// seen across groups and re-keyed `0..n`. The source is not modified,
    /// so resolving twice yields equal results.
    pub fn resolve(&self, source: &Collection) -> Result<Collection> {
        if self.groups.is_empty() {
            debug!(records = source.len(), "no condition groups, returning source");
            return Ok(source.clone());
        }

        let mut matched: IndexSet<Key> = IndexSet::new();
        for (index, group) in self.groups.iter().enumerate() {
            let passing = evaluate_group(group, source)?;
            trace!(
                group = index,
                combinator = %group.combinator,
                terms = group.terms.len(),
                fields = ?group.terms.iter().filter_map(Term::field).collect::<Vec<_>>(),
                passing = passing.len(),
                "evaluated condition group"
            );
            matched.extend(passing.keys().cloned());
        }

        let result: Collection = matched
            .iter()
            .filter_map(|key| source.get(key).cloned())
            .collect();
        debug!(
            groups = self.groups.len(),
            records = source.len(),
            matched = result.len(),
            "resolved query"
        );
        Ok(result)
    }
}
