//! Recset - Chainable where/or-where queries over in-memory records.
//!
//! Recset filters ordered collections of nested, schema-less records (JSON
//! values). It supports:
//!
//! - Equality, loose membership, range and custom predicate terms
//! - Flat argument lists with embedded operator tokens (`"age", ">", 18`)
//! - AND and OR condition groups accumulated across builder calls
//! - Grouping, de-duplication and aggregate reductions on the result
//!
//! # Quick Start
//!
//! ```rust
//! use recset::{args, Arg, Collection};
//! use serde_json::json;
//!
//! let people = Collection::from_value(json!([
//!     {"name": "Ada", "age": 36, "team": "red"},
//!     {"name": "Linus", "age": 17, "team": "blue"},
//!     {"name": "Grace", "age": 85, "team": "red"},
//! ]))
//! .unwrap();
//!
//! let result = people
//!     .query()
//!     .and_where(args!["age", ">=", 18])
//!     .and_where([Arg::eq("team", "red")])
//!     .get()
//!     .unwrap();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0]["name"], "Ada");
//! ```
//!
//! # Query Semantics
//!
//! Every `and_where`/`or_where` call adds one condition group:
//!
//! - **AND group**: all terms must hold; evaluation stops at the first false term
//! - **OR group**: at least one term must hold; every term is evaluated
//!
//! Groups are evaluated independently against the full source and their
//! results are combined by union, in the order keys were first seen:
//!
//! ```text
//! result = group 1 ∪ group 2 ∪ ... ∪ group n      (re-keyed 0..n)
//! ```
//!
//! A term naming a field a record does not have fails the whole resolution
//! with [`QueryError::FieldNotFound`].
//!
//! # Terms
//!
//! | Argument | Term |
//! |----------|------|
//! | `Arg::eq(field, scalar)` | text equality (`36` matches `"36"`) |
//! | `Arg::eq(field, array)`, `Arg::one_of(field, values)` | loose membership |
//! | `Arg::eq(field, {op: value})` | range |
//! | `Arg::test(field, closure)` | predicate |
//! | `args![field, op, value]`, `Arg::range(field, op, value)` | range |
//! | `Arg::wrapped(field, operand)` | the inner keyed term |
//!
//! Operator tokens are `>`, `>=`, `<`, `<=`, `<>` and `contains`.

mod collection;
mod error;
mod eval;
mod normalize;
mod op;
mod post;
mod query;
mod session;
mod term;
pub mod value;

// Re-export public API
pub use collection::{Collection, Key};
pub use error::{QueryError, Result};
pub use eval::evaluate_group;
pub use normalize::normalize;
pub use op::Op;
pub use post::{group_by, unique, UniqueBy};
pub use query::Query;
pub use session::Session;
pub use term::{Arg, Combinator, ConditionGroup, Operand, Predicate, Term};
pub use value::{compare_values, Number};
