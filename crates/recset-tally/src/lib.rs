//! Recset Tally - Named counters for reporting passes over record sets.
//!
//! A [`Tally`] holds any number of categories. Each category counts in one
//! of two modes, fixed by its first use:
//!
//! | Mode | Operation | Count |
//! |------|-----------|-------|
//! | [`Mode::Distinct`] | [`Tally::add`] | number of distinct names |
//! | [`Mode::Sum`] | [`Tally::incr`] | sum of the steps |
//!
//! Mixing modes on one category is a [`TallyError::ModeConflict`].
//!
//! ```rust
//! use recset::{Arg, Collection};
//! use recset_tally::{ratio, Tally};
//! use serde_json::json;
//!
//! let orders = Collection::from_value(json!([
//!     {"customer": "ada", "paid": true, "total": 40},
//!     {"customer": "ada", "paid": false, "total": 15},
//!     {"customer": "linus", "paid": true, "total": 5},
//! ]))
//! .unwrap();
//!
//! let mut tally = Tally::new();
//! for order in orders.values() {
//!     let paid = order["paid"] == true;
//!     tally.add("customers", order["customer"].as_str().unwrap_or_default()).unwrap();
//!     tally.incr_if(paid, "paid", 1).unwrap();
//! }
//!
//! let paid = tally.count("paid").to_f64();
//! assert_eq!(ratio(paid, orders.len()), Some(66.67));
//! assert_eq!(tally.count("customers").to_f64(), 2.0);
//!
//! let unpaid = orders.query().and_where([Arg::eq("paid", false)]).count().unwrap();
//! assert_eq!(unpaid, 1);
//! ```

mod error;
mod tally;

pub use error::{Result, TallyError};
pub use tally::{ratio, Mode, Tally};
