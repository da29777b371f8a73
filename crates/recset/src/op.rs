//! Range operators for query terms.
//!
//! The [`Op`] enum covers the operator tokens recognized inside a flat
//! argument list (`"age", ">", 18`) and inside pre-built range triples.

use std::cmp::Ordering;

/// Comparison operator of a range term.
///
/// Operators fall into two families:
/// - **Ordering**: `Gt`, `Gte`, `Lt`, `Lte` compare numbers and numeric
///   strings numerically, other strings lexically
/// - **Textual**: `Ne` (`<>`) and `Contains` work on the text form of the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Gte,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Lte,
    /// Textual inequality (`<>`).
    Ne,
    /// Substring containment (`contains`).
    Contains,
}

impl Op {
    /// All operators, in the order tokens are documented.
    pub const ALL: [Op; 6] = [Op::Gt, Op::Gte, Op::Lt, Op::Lte, Op::Ne, Op::Contains];

    /// Parses an operator token, returning `None` for anything else.
    pub fn from_token(token: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.as_str() == token)
    }

    /// Returns `true` if this operator is decided by an [`Ordering`].
    pub fn is_ordering(self) -> bool {
        matches!(self, Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Evaluates an ordering of `field` relative to the literal.
    ///
    /// Textual operators always return `false` here.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            Op::Ne | Op::Contains => false,
        }
    }

    /// Returns the token for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Ne => "<>",
            Op::Contains => "contains",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
