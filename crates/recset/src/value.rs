//! Scalar helpers over [`serde_json::Value`].
//!
//! Records are plain JSON values. This module holds the pieces the evaluator
//! and the aggregates share: the [`Number`] type used for mixed-width numeric
//! comparison, value ordering, textual and loose equality, and the text form
//! the textual operators work on.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::ops::Add;

use serde_json::Value;

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Comparisons between different numeric types are handled by converting
/// to the appropriate common type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::I64(a), Number::U64(b)) => Some(i128::from(a).cmp(&i128::from(b))),
            (Number::U64(a), Number::I64(b)) => Some(i128::from(a).cmp(&i128::from(b))),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    fn as_i128(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(i128::from(n)),
            Number::U64(n) => Some(i128::from(n)),
            Number::F64(_) => None,
        }
    }

    /// Reads a JSON number.
    pub fn from_json(n: &serde_json::Number) -> Number {
        if let Some(i) = n.as_i64() {
            Number::I64(i)
        } else if let Some(u) = n.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }

    /// Parses a numeric string such as `"18"`, `" 2.5"` or `"-3"`.
    ///
    /// Non-finite spellings (`"NaN"`, `"inf"`) are not numeric.
    pub fn parse(s: &str) -> Option<Number> {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Some(Number::I64(i));
        }
        if let Ok(u) = s.parse::<u64>() {
            return Some(Number::U64(u));
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(Number::F64(f)),
            _ => None,
        }
    }

    /// Reads a number from a JSON number or a numeric string.
    pub fn from_value(value: &Value) -> Option<Number> {
        match value {
            Value::Number(n) => Some(Number::from_json(n)),
            Value::String(s) => Number::parse(s),
            _ => None,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl Add for Number {
    type Output = Number;

    /// Stays integral while both sides are integers and the sum fits.
    fn add(self, other: Number) -> Number {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => {
                let sum = a + b;
                if let Ok(n) = i64::try_from(sum) {
                    Number::I64(n)
                } else if let Ok(n) = u64::try_from(sum) {
                    Number::U64(n)
                } else {
                    Number::F64(sum as f64)
                }
            }
            _ => Number::F64(self.to_f64() + other.to_f64()),
        }
    }
}

impl From<Number> for Value {
    /// Non-finite floats have no JSON form and become `null`.
    fn from(n: Number) -> Self {
        match n {
            Number::I64(i) => Value::from(i),
            Number::U64(u) => Value::from(u),
            Number::F64(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(i64::from(n))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(u64::from(n))
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Compares two scalar values.
///
/// Numbers compare numerically, and so does a number or numeric string
/// against another numeric string (`"10" > "9"`). Other strings compare
/// lexically. Returns `None` when the kinds cannot be ordered against each
/// other (including nested values and NaN).
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Number::from_json(a).compare(Number::from_json(b)),
        (Value::String(a), Value::String(b)) => match (Number::parse(a), Number::parse(b)) {
            (Some(x), Some(y)) => x.compare(y),
            _ => Some(a.cmp(b)),
        },
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Number(n), Value::String(s)) => Number::from_json(n).compare(Number::parse(s)?),
        (Value::String(s), Value::Number(n)) => Number::parse(s)?.compare(Number::from_json(n)),
        _ => None,
    }
}

/// Byte-exact equality of the [`text`] forms.
///
/// `36` equals `"36"` and `36.0`, but `"ada"` does not equal `"Ada"`.
/// Nested values never match.
pub fn text_eq(a: &Value, b: &Value) -> bool {
    if is_nested(a) || is_nested(b) {
        return false;
    }
    text(a) == text(b)
}

/// Loose scalar equality used for membership checks.
///
/// Extends [`text_eq`] so that numeric values are compared by value
/// (`18 == "18.0"`).
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (Number::from_value(a), Number::from_value(b)) {
        (Some(x), Some(y)) => x.compare(y) == Some(Ordering::Equal),
        _ => text_eq(a, b),
    }
}

/// Text form of a value for the textual operators.
///
/// Strings are returned as is, `null` is empty, integral floats drop their
/// fraction (`36.0` is `"36"`), nested values render as compact JSON.
pub fn text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        }),
        nested => Cow::Owned(nested.to_string()),
    }
}

/// Returns `true` for arrays and objects.
pub fn is_nested(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Short name of a value's kind, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolves a dot-separated path such as `"owner.address.city"`.
///
/// Object segments are looked up by name and array segments by index.
/// An empty path returns the value itself.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
