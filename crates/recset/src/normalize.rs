//! Rewrites the raw arguments of one builder call into terms.
//!
//! Operator tokens found among the positional arguments pull in their left
//! and right positional neighbours and become range terms. String-keyed
//! entries do not take part in positional adjacency, so
//! `[eq("team", "red"), "age", ">", 18]` still yields `age > 18`.

use serde_json::{json, Map, Value};

use crate::op::Op;
use crate::term::{Arg, Operand, Term};

/// Normalizes one argument list.
///
/// Remaining arguments keep their order; range terms built from operator
/// tokens follow them in scan order. Field existence is not checked here.
pub fn normalize(args: Vec<Arg>) -> Vec<Term> {
    let mut slots: Vec<Option<Arg>> = args.into_iter().map(Some).collect();

    // Slot indexes of positional arguments, in order.
    let positions: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| !matches!(slot, Some(Arg::Keyed(..))))
        .map(|(index, _)| index)
        .collect();

    let mut ranges = Vec::new();
    let mut p = 0;
    while p < positions.len() {
        let slot = positions[p];
        let Some(op) = operator_token(slots[slot].as_ref()) else {
            p += 1;
            continue;
        };
        slots[slot] = None;
        let left = p
            .checked_sub(1)
            .and_then(|prev| slots[positions[prev]].take());
        let right = positions
            .get(p + 1)
            .and_then(|&next| slots[next].take());
        ranges.push(range_term(left, op, right));
        p += 2;
    }

    slots
        .into_iter()
        .flatten()
        .map(classify)
        .chain(ranges)
        .collect()
}

fn operator_token(arg: Option<&Arg>) -> Option<Op> {
    match arg {
        Some(Arg::Positional(Value::String(token))) => Op::from_token(token),
        _ => None,
    }
}

fn range_term(left: Option<Arg>, op: Op, right: Option<Arg>) -> Term {
    match (left, right) {
        (Some(Arg::Positional(Value::String(field))), Some(Arg::Positional(value))) => {
            Term::Range { field, op, value }
        }
        (left, right) => Term::Unsupported(Value::Array(vec![
            left.as_ref().map_or(Value::Null, shape),
            Value::String(op.as_str().to_string()),
            right.as_ref().map_or(Value::Null, shape),
        ])),
    }
}

fn classify(arg: Arg) -> Term {
    match arg {
        Arg::Keyed(field, operand) => keyed_term(field, operand),
        Arg::Wrapped(field, operand) => Term::Wrapped(Box::new(keyed_term(field, operand))),
        Arg::Tuple(items) => tuple_term(items),
        Arg::Positional(value) => Term::Unsupported(value),
    }
}

fn keyed_term(field: String, operand: Operand) -> Term {
    match operand {
        Operand::Scalar(Value::Array(values)) | Operand::List(values) => Term::In { field, values },
        Operand::Scalar(Value::Object(map)) => operator_entry(field, map),
        Operand::Scalar(value) => Term::Equals { field, value },
        Operand::Predicate(predicate) => Term::Predicate { field, predicate },
    }
}

/// `{field: {op: value}}`, the structured form of a flat `field op value`.
fn operator_entry(field: String, map: Map<String, Value>) -> Term {
    if map.len() == 1 {
        if let Some((token, value)) = map.iter().next() {
            if let Some(op) = Op::from_token(token) {
                return Term::Range {
                    field,
                    op,
                    value: value.clone(),
                };
            }
        }
    }
    Term::Unsupported(single_entry(field, Value::Object(map)))
}

fn tuple_term(items: Vec<Value>) -> Term {
    match <[Value; 3]>::try_from(items) {
        Ok([Value::String(field), Value::String(token), value]) => match Op::from_token(&token) {
            Some(op) => Term::Range { field, op, value },
            None => Term::Unsupported(json!([field, token, value])),
        },
        Ok(other) => Term::Unsupported(Value::Array(other.into())),
        Err(items) => match <[Value; 2]>::try_from(items) {
            Ok([first, second]) => Term::Reserved(first, second),
            Err(items) => Term::Unsupported(Value::Array(items)),
        },
    }
}

/// Plain rendering of an argument for diagnostics.
fn shape(arg: &Arg) -> Value {
    fn operand(operand: &Operand) -> Value {
        match operand {
            Operand::Scalar(value) => value.clone(),
            Operand::List(values) => Value::Array(values.clone()),
            Operand::Predicate(_) => json!("<predicate>"),
        }
    }

    match arg {
        Arg::Positional(value) => value.clone(),
        Arg::Tuple(items) => Value::Array(items.clone()),
        Arg::Keyed(field, op) | Arg::Wrapped(field, op) => single_entry(field.clone(), operand(op)),
    }
}

fn single_entry(field: String, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(field, value);
    Value::Object(map)
}
