//! Error types for the tally registry.

use thiserror::Error;

use crate::tally::Mode;

/// Errors raised by [`Tally`](crate::Tally).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TallyError {
    /// A category was used in a mode other than the one it was created with.
    #[error("category '{category}' counts in {existing} mode, cannot use it in {requested} mode")]
    ModeConflict {
        category: String,
        existing: Mode,
        requested: Mode,
    },
}

/// Result type for tally operations.
pub type Result<T> = std::result::Result<T, TallyError>;
