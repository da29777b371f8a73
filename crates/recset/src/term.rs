//! Condition terms and the raw arguments they are built from.
//!
//! A builder call receives a flat list of [`Arg`]s. The normalizer turns
//! that list into [`Term`]s, one variant per shape, so the evaluator can
//! dispatch on the variant instead of inspecting values at run time.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::op::Op;

/// A user predicate applied to a field's value.
///
/// Cloning shares the closure.
#[derive(Clone)]
pub struct Predicate(Rc<dyn Fn(&Value) -> bool>);

impl Predicate {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Predicate(Rc::new(f))
    }

    /// Calls the predicate.
    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Right-hand side of a string-keyed argument.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A single value; arrays are treated as candidate lists.
    Scalar(Value),
    /// Candidate values for a membership check.
    List(Vec<Value>),
    /// A closure applied to the field's value.
    Predicate(Predicate),
}

impl From<Predicate> for Operand {
    fn from(predicate: Predicate) -> Self {
        Operand::Predicate(predicate)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(values: Vec<Value>) -> Self {
        Operand::List(values)
    }
}

/// One raw argument of a `where`-style call.
#[derive(Debug, Clone)]
pub enum Arg {
    /// `field => operand` entry.
    Keyed(String, Operand),
    /// Bare positional value: a field name, an operator token or a literal.
    Positional(Value),
    /// Positional list, e.g. a pre-built `[field, op, value]` triple.
    Tuple(Vec<Value>),
    /// Positional one-entry mapping `{field: operand}`.
    Wrapped(String, Operand),
}

impl Arg {
    /// `field` must equal `value` (or be one of its elements, for arrays).
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Arg::Keyed(field.into(), Operand::Scalar(value.into()))
    }

    /// `field` must loosely equal one of `values`.
    pub fn one_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Arg::Keyed(
            field.into(),
            Operand::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// `predicate` must hold for the value of `field`.
    pub fn test<F>(field: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Arg::Keyed(field.into(), Operand::Predicate(Predicate::new(predicate)))
    }

    /// Pre-built range triple.
    pub fn range(field: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Arg::Tuple(vec![
            Value::String(field.into()),
            Value::String(op.as_str().to_string()),
            value.into(),
        ])
    }

    /// One-entry mapping carrying a field name inside a positional list.
    pub fn wrapped(field: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Arg::Wrapped(field.into(), operand.into())
    }

    /// A positional value.
    pub fn token(value: impl Into<Value>) -> Self {
        Arg::Positional(value.into())
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Positional(Value::String(s.to_string()))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Positional(Value::String(s))
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Positional(value)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(n: $ty) -> Self {
                    Arg::Positional(Value::from(n))
                }
            }

            impl From<$ty> for Operand {
                fn from(n: $ty) -> Self {
                    Operand::Scalar(Value::from(n))
                }
            }
        )*
    };
}

scalar_from!(i32, i64, u32, u64, usize, f64, bool);

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Scalar(Value::String(s.to_string()))
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::Scalar(Value::String(s))
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Scalar(value)
    }
}

/// Builds a `Vec<Arg>` from positional values.
///
/// ```
/// use recset::{args, Arg};
///
/// let list: Vec<Arg> = args!["age", ">", 18];
/// assert_eq!(list.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::Arg::from($arg)),*]
    };
}

/// A normalized condition term.
#[derive(Debug, Clone)]
pub enum Term {
    /// The field's value is passed to a predicate.
    Predicate { field: String, predicate: Predicate },
    /// Byte-exact match of the text forms.
    Equals { field: String, value: Value },
    /// Loose membership in a candidate list.
    In { field: String, values: Vec<Value> },
    /// A one-entry mapping holding an `Equals`, `In` or `Predicate` term.
    Wrapped(Box<Term>),
    /// Comparison against a literal.
    Range { field: String, op: Op, value: Value },
    /// Two-element tuple; no evaluation rule is defined for it.
    Reserved(Value, Value),
    /// Any other shape the normalizer could not classify.
    Unsupported(Value),
}

impl Term {
    /// Field the term reads, if it has one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Term::Predicate { field, .. }
            | Term::Equals { field, .. }
            | Term::In { field, .. }
            | Term::Range { field, .. } => Some(field),
            Term::Wrapped(inner) => inner.field(),
            Term::Reserved(..) | Term::Unsupported(_) => None,
        }
    }
}

/// How the terms of one group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Every term must hold.
    And,
    /// At least one term must hold.
    Or,
}

impl Combinator {
    /// Returns the display name of this combinator.
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The terms contributed by one builder call.
#[derive(Debug, Clone)]
pub struct ConditionGroup {
    /// How the terms combine.
    pub combinator: Combinator,
    /// Terms in argument order, range terms from operator tokens last.
    pub terms: Vec<Term>,
}

impl ConditionGroup {
    /// Creates a group.
    pub fn new(combinator: Combinator, terms: Vec<Term>) -> Self {
        ConditionGroup { combinator, terms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn predicate_calls_closure() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let p = Predicate::new(move |v| {
            seen.set(seen.get() + 1);
            v.as_i64() == Some(3)
        });
        assert!(p.test(&json!(3)));
        assert!(!p.clone().test(&json!(4)));
        assert_eq!(calls.get(), 2);
        assert_eq!(format!("{p:?}"), "Predicate(..)");
    }

    #[test]
    fn args_macro_builds_positionals() {
        let list = args!["age", ">=", 18, true];
        assert!(matches!(&list[0], Arg::Positional(Value::String(s)) if s == "age"));
        assert!(matches!(&list[2], Arg::Positional(v) if *v == json!(18)));
        assert!(matches!(&list[3], Arg::Positional(Value::Bool(true))));
    }

    #[test]
    fn range_constructor_uses_tokens() {
        let Arg::Tuple(items) = Arg::range("age", Op::Gte, 18) else {
            panic!("expected tuple");
        };
        assert_eq!(items, vec![json!("age"), json!(">="), json!(18)]);
    }

    #[test]
    fn term_field() {
        let inner = Term::Equals {
            field: "name".into(),
            value: json!("x"),
        };
        assert_eq!(Term::Wrapped(Box::new(inner)).field(), Some("name"));
        assert_eq!(Term::Reserved(json!("a"), json!(1)).field(), None);
    }

    #[test]
    fn combinator_display() {
        assert_eq!(Combinator::And.to_string(), "AND");
        assert_eq!(Combinator::Or.to_string(), "OR");
    }
}
