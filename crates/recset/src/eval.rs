//! Predicate evaluation.
//!
//! Applies one [`ConditionGroup`] to every record of a collection. A missing
//! field is an error rather than a non-match, and it aborts the whole group.

use serde_json::Value;

use crate::collection::Collection;
use crate::error::{QueryError, Result};
use crate::op::Op;
use crate::term::{Combinator, ConditionGroup, Term};
use crate::value;

impl Term {
    /// Evaluates this term against one record.
    ///
    /// Membership against a nested field value is a non-match.
    pub fn matches(&self, record: &Value) -> Result<bool> {
        match self {
            Term::Predicate { field, predicate } => {
                Ok(predicate.test(field_value(record, field)?))
            }
            Term::Equals { field, value } => {
                Ok(value::text_eq(field_value(record, field)?, value))
            }
            Term::In { field, values } => {
                let actual = field_value(record, field)?;
                if value::is_nested(actual) {
                    return Ok(false);
                }
                Ok(values.iter().any(|candidate| value::loose_eq(actual, candidate)))
            }
            Term::Wrapped(inner) => inner.matches(record),
            Term::Range { field, op, value } => {
                Ok(range_holds(field_value(record, field)?, *op, value))
            }
            Term::Reserved(first, second) => Err(QueryError::unsupported(Value::Array(vec![
                first.clone(),
                second.clone(),
            ]))),
            Term::Unsupported(shape) => Err(QueryError::unsupported(shape)),
        }
    }
}

impl ConditionGroup {
    /// Evaluates the group against one record.
    ///
    /// AND stops at the first false term. OR evaluates every term before
    /// deciding, so an error in any term surfaces even after a match.
    pub fn matches(&self, record: &Value) -> Result<bool> {
        match self.combinator {
            Combinator::And => {
                for term in &self.terms {
                    if !term.matches(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Combinator::Or => {
                let mut any = false;
                for term in &self.terms {
                    any |= term.matches(record)?;
                }
                Ok(any)
            }
        }
    }
}

/// Returns the records of `source` that satisfy `group`, keyed as in the source.
pub fn evaluate_group(group: &ConditionGroup, source: &Collection) -> Result<Collection> {
    let mut passing = Collection::new();
    for (key, record) in source {
        if group.matches(record)? {
            passing.insert(key.clone(), record.clone());
        }
    }
    Ok(passing)
}

fn field_value<'a>(record: &'a Value, field: &str) -> Result<&'a Value> {
    record
        .as_object()
        .and_then(|map| map.get(field))
        .ok_or_else(|| QueryError::field_not_found(field))
}

fn range_holds(actual: &Value, op: Op, literal: &Value) -> bool {
    if op.is_ordering() {
        return value::compare_values(actual, literal)
            .is_some_and(|ordering| op.eval_ordering(ordering));
    }
    if op == Op::Contains {
        value::text(actual).contains(&*value::text(literal))
    } else {
        value::text(actual) != value::text(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Key;
    use crate::term::Predicate;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn equals(field: &str, value: Value) -> Term {
        Term::Equals {
            field: field.into(),
            value,
        }
    }

    fn range(field: &str, op: Op, value: Value) -> Term {
        Term::Range {
            field: field.into(),
            op,
            value,
        }
    }

    fn counting(calls: &Rc<Cell<usize>>, result: bool) -> Term {
        let calls = Rc::clone(calls);
        Term::Predicate {
            field: "age".into(),
            predicate: Predicate::new(move |_| {
                calls.set(calls.get() + 1);
                result
            }),
        }
    }

    #[test]
    fn equality_compares_text_forms() {
        let record = json!({"name": "Ada", "age": 36});
        assert!(equals("name", json!("Ada")).matches(&record).unwrap());
        assert!(!equals("name", json!("ada")).matches(&record).unwrap());
        assert!(equals("age", json!("36")).matches(&record).unwrap());
        assert!(equals("age", json!(36.0)).matches(&record).unwrap());
        assert!(!equals("age", json!("36.0")).matches(&record).unwrap());
    }

    #[test]
    fn missing_field_is_an_error() {
        let record = json!({"name": "Ada"});
        let err = equals("age", json!(1)).matches(&record).unwrap_err();
        assert!(matches!(err, QueryError::FieldNotFound { field } if field == "age"));

        let err = range("age", Op::Gt, json!(1)).matches(&record).unwrap_err();
        assert!(matches!(err, QueryError::FieldNotFound { .. }));

        // Scalars have no fields at all
        assert!(equals("name", json!("x")).matches(&json!(3)).is_err());
    }

    #[test]
    fn null_field_is_present() {
        let record = json!({"deleted_at": null});
        assert!(equals("deleted_at", Value::Null).matches(&record).unwrap());
    }

    #[test]
    fn membership_is_loose() {
        let record = json!({"age": 18});
        let term = Term::In {
            field: "age".into(),
            values: vec![json!("17"), json!("18")],
        };
        assert!(term.matches(&record).unwrap());
    }

    #[test]
    fn membership_on_nested_value_is_non_match() {
        let term = Term::In {
            field: "tags".into(),
            values: vec![json!("a")],
        };
        assert!(!term.matches(&json!({"tags": ["a"]})).unwrap());
        assert!(!term.matches(&json!({"tags": {"0": "a"}})).unwrap());
    }

    #[test]
    fn range_operators() {
        let record = json!({"age": 30, "name": "Grace Hopper"});
        assert!(range("age", Op::Gt, json!(18)).matches(&record).unwrap());
        assert!(!range("age", Op::Lt, json!(30)).matches(&record).unwrap());
        assert!(range("age", Op::Lte, json!(30)).matches(&record).unwrap());
        assert!(!range("age", Op::Gte, json!(30.5)).matches(&record).unwrap());
        assert!(range("age", Op::Ne, json!("31")).matches(&record).unwrap());
        assert!(!range("age", Op::Ne, json!("30")).matches(&record).unwrap());
        assert!(range("name", Op::Contains, json!("Hop")).matches(&record).unwrap());
        assert!(!range("name", Op::Contains, json!("hop")).matches(&record).unwrap());
        assert!(range("age", Op::Gt, json!("9")).matches(&record).unwrap());
        // Incomparable kinds never satisfy an ordering
        assert!(!range("name", Op::Gt, json!(1)).matches(&record).unwrap());
    }

    #[test]
    fn numeric_strings_order_by_value() {
        let record = json!({"version": "10"});
        assert!(range("version", Op::Gt, json!("9")).matches(&record).unwrap());
        assert!(!range("version", Op::Lt, json!("9")).matches(&record).unwrap());
        // Non-numeric text stays lexical
        assert!(range("version", Op::Lt, json!("9x")).matches(&record).unwrap());
    }

    #[test]
    fn wrapped_unwraps() {
        let term = Term::Wrapped(Box::new(equals("name", json!("Ada"))));
        assert!(term.matches(&json!({"name": "Ada"})).unwrap());
    }

    #[test]
    fn reserved_and_unsupported_shapes_fail() {
        let record = json!({"a": 1});
        let err = Term::Reserved(json!("a"), json!(1)).matches(&record).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedTermShape { shape } if shape == r#"["a",1]"#));
        assert!(Term::Unsupported(json!("x")).matches(&record).is_err());
    }

    #[test]
    fn and_short_circuits() {
        let calls = Rc::new(Cell::new(0));
        let group = ConditionGroup::new(
            Combinator::And,
            vec![equals("age", json!(99)), counting(&calls, true)],
        );
        assert!(!group.matches(&json!({"age": 1})).unwrap());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn or_evaluates_every_term() {
        let calls = Rc::new(Cell::new(0));
        let group = ConditionGroup::new(
            Combinator::Or,
            vec![counting(&calls, false), counting(&calls, true)],
        );
        assert!(group.matches(&json!({"age": 1})).unwrap());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn or_surfaces_errors_after_a_match() {
        let group = ConditionGroup::new(
            Combinator::Or,
            vec![equals("age", json!(1)), equals("missing", json!(1))],
        );
        assert!(group.matches(&json!({"age": 1})).is_err());
    }

    #[test]
    fn evaluate_group_keeps_source_keys() {
        let source = Collection::from_value(json!([
            {"age": 10},
            {"age": 20},
            {"age": 30},
        ]))
        .unwrap();
        let group = ConditionGroup::new(Combinator::And, vec![range("age", Op::Gte, json!(20))]);
        let passing = evaluate_group(&group, &source).unwrap();
        let keys: Vec<_> = passing.keys().cloned().collect();
        assert_eq!(keys, vec![Key::Index(1), Key::Index(2)]);
    }

    #[test]
    fn evaluate_group_aborts_on_first_error() {
        let source = Collection::from_value(json!([{"age": 10}, {"name": "x"}])).unwrap();
        let group = ConditionGroup::new(Combinator::And, vec![equals("age", json!(10))]);
        assert!(matches!(
            evaluate_group(&group, &source),
            Err(QueryError::FieldNotFound { .. })
        ));
    }
}
