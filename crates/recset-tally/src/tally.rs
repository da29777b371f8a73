//! The counter registry.

use std::cmp::Ordering;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use recset::Number;
use tracing::{debug, trace};

use crate::error::{Result, TallyError};

/// How a category accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Counts distinct names added with [`Tally::add`].
    Distinct,
    /// Sums the steps given to [`Tally::incr`].
    Sum,
}

impl Mode {
    /// Returns the display name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Distinct => "distinct",
            Mode::Sum => "sum",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
enum Counter {
    Distinct(IndexSet<String>),
    Sum(Number),
}

impl Counter {
    fn mode(&self) -> Mode {
        match self {
            Counter::Distinct(_) => Mode::Distinct,
            Counter::Sum(_) => Mode::Sum,
        }
    }

    fn count(&self) -> Number {
        match self {
            Counter::Distinct(names) => Number::from(names.len()),
            Counter::Sum(total) => *total,
        }
    }
}

/// A registry of named counters.
///
/// Each category counts in one [`Mode`], fixed by the first operation that
/// touches it. The registry is an ordinary value: create one per reporting
/// pass and drop or [`reset`](Tally::reset) it when the pass is over.
///
/// # Example
///
/// ```
/// use recset::Number;
/// use recset_tally::Tally;
///
/// let mut tally = Tally::new();
/// tally.add("visitors", "ada").unwrap();
/// tally.add("visitors", "ada").unwrap();
/// tally.add("visitors", "linus").unwrap();
/// tally.incr("orders", 2).unwrap();
/// tally.incr("orders", 1.5).unwrap();
///
/// assert_eq!(tally.count("visitors"), Number::U64(2));
/// assert_eq!(tally.count("orders"), Number::F64(3.5));
/// assert!(tally.incr("visitors", 1).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tally {
    counters: IndexMap<String, Counter>,
}

impl Tally {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Tally::default()
    }

    fn counter(&mut self, category: &str, mode: Mode) -> Result<&mut Counter> {
        let counter = self
            .counters
            .entry(category.to_string())
            .or_insert_with(|| {
                trace!(category, mode = %mode, "new tally category");
                match mode {
                    Mode::Distinct => Counter::Distinct(IndexSet::new()),
                    Mode::Sum => Counter::Sum(Number::I64(0)),
                }
            });
        if counter.mode() != mode {
            return Err(TallyError::ModeConflict {
                category: category.to_string(),
                existing: counter.mode(),
                requested: mode,
            });
        }
        Ok(counter)
    }

    /// Records `name` in a distinct-mode category.
    ///
    /// Adding a name twice counts it once.
    pub fn add(&mut self, category: &str, name: impl Into<String>) -> Result<()> {
        if let Counter::Distinct(names) = self.counter(category, Mode::Distinct)? {
            names.insert(name.into());
        }
        Ok(())
    }

    /// Adds `step` to a sum-mode category.
    ///
    /// A negative running total restarts from zero on the next step.
    pub fn incr(&mut self, category: &str, step: impl Into<Number>) -> Result<()> {
        if let Counter::Sum(total) = self.counter(category, Mode::Sum)? {
            if total.compare(Number::I64(0)) == Some(Ordering::Less) {
                *total = Number::I64(0);
            }
            *total = *total + step.into();
        }
        Ok(())
    }

    /// [`add`](Self::add) when `condition` holds.
    pub fn add_if(
        &mut self,
        condition: bool,
        category: &str,
        name: impl Into<String>,
    ) -> Result<()> {
        if condition {
            self.add(category, name)?;
        }
        Ok(())
    }

    /// [`incr`](Self::incr) when `condition` holds.
    pub fn incr_if(
        &mut self,
        condition: bool,
        category: &str,
        step: impl Into<Number>,
    ) -> Result<()> {
        if condition {
            self.incr(category, step)?;
        }
        Ok(())
    }

    /// Distinct names or summed value of `category`; zero when unknown.
    pub fn count(&self, category: &str) -> Number {
        self.counters
            .get(category)
            .map_or(Number::I64(0), Counter::count)
    }

    /// Like [`count`](Self::count), but returns `default` when the count is
    /// zero or negative.
    pub fn count_or(&self, category: &str, default: impl Into<Number>) -> Number {
        let count = self.count(category);
        match count.compare(Number::I64(0)) {
            Some(Ordering::Greater) => count,
            _ => default.into(),
        }
    }

    /// The mode `category` counts in, if it has been used.
    pub fn mode(&self, category: &str) -> Option<Mode> {
        self.counters.get(category).map(Counter::mode)
    }

    /// Categories in first-use order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.counters.keys().map(String::as_str)
    }

    /// Forgets one category, so it may be reused in either mode.
    pub fn remove(&mut self, category: &str) -> bool {
        let removed = self.counters.shift_remove(category).is_some();
        if removed {
            debug!(category, "removed tally category");
        }
        removed
    }

    /// Forgets every category.
    pub fn reset(&mut self) {
        debug!(categories = self.counters.len(), "reset tally");
        self.counters.clear();
    }

    /// Returns `true` if no category has been used.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

/// `part` as a percentage of `whole`, with two decimals.
///
/// The quotient is rounded to four places (halves toward zero) before
/// scaling. Returns `None` when `whole` is zero.
///
/// ```
/// assert_eq!(recset_tally::ratio(1, 3), Some(33.33));
/// assert_eq!(recset_tally::ratio(5, 0), None);
/// ```
pub fn ratio(part: impl Into<Number>, whole: impl Into<Number>) -> Option<f64> {
    let whole = whole.into().to_f64();
    if whole == 0.0 || !whole.is_finite() {
        return None;
    }
    let scaled = part.into().to_f64() / whole * 10_000.0;
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        scaled.trunc()
    } else {
        scaled.round()
    };
    Some(rounded / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_counts_unique_names() {
        let mut tally = Tally::new();
        for name in ["a", "b", "a", "c", "b"] {
            tally.add("letters", name).unwrap();
        }
        assert_eq!(tally.count("letters"), Number::U64(3));
        assert_eq!(tally.mode("letters"), Some(Mode::Distinct));
    }

    #[test]
    fn sum_accumulates_steps() {
        let mut tally = Tally::new();
        tally.incr("total", 3).unwrap();
        tally.incr("total", 4).unwrap();
        assert_eq!(tally.count("total"), Number::I64(7));
        tally.incr("total", 0.5).unwrap();
        assert_eq!(tally.count("total"), Number::F64(7.5));
    }

    #[test]
    fn negative_total_restarts_from_zero() {
        let mut tally = Tally::new();
        tally.incr("delta", -5).unwrap();
        assert_eq!(tally.count("delta"), Number::I64(-5));
        tally.incr("delta", 2).unwrap();
        assert_eq!(tally.count("delta"), Number::I64(2));
    }

    #[test]
    fn mode_conflict() {
        let mut tally = Tally::new();
        tally.add("seen", "x").unwrap();
        let err = tally.incr("seen", 1).unwrap_err();
        assert_eq!(
            err,
            TallyError::ModeConflict {
                category: "seen".into(),
                existing: Mode::Distinct,
                requested: Mode::Sum,
            }
        );
        assert_eq!(
            err.to_string(),
            "category 'seen' counts in distinct mode, cannot use it in sum mode"
        );
        // The failed call leaves the category untouched
        assert_eq!(tally.count("seen"), Number::U64(1));
    }

    #[test]
    fn conditional_variants() {
        let mut tally = Tally::new();
        tally.add_if(false, "names", "skip").unwrap();
        tally.add_if(true, "names", "keep").unwrap();
        tally.incr_if(false, "hits", 10).unwrap();
        tally.incr_if(true, "hits", 1).unwrap();
        assert_eq!(tally.count("names"), Number::U64(1));
        assert_eq!(tally.count("hits"), Number::I64(1));
    }

    #[test]
    fn skipped_condition_does_not_fix_mode() {
        let mut tally = Tally::new();
        tally.incr_if(false, "flex", 1).unwrap();
        assert_eq!(tally.mode("flex"), None);
        tally.add("flex", "a").unwrap();
        assert_eq!(tally.mode("flex"), Some(Mode::Distinct));
    }

    #[test]
    fn count_defaults() {
        let mut tally = Tally::new();
        assert_eq!(tally.count("nothing"), Number::I64(0));
        assert_eq!(tally.count_or("nothing", 9), Number::I64(9));
        tally.incr("loss", -1).unwrap();
        assert_eq!(tally.count_or("loss", 0), Number::I64(0));
        tally.add("one", "x").unwrap();
        assert_eq!(tally.count_or("one", 9), Number::U64(1));
    }

    #[test]
    fn remove_and_reset() {
        let mut tally = Tally::new();
        tally.add("a", "x").unwrap();
        tally.incr("b", 1).unwrap();
        assert_eq!(tally.categories().collect::<Vec<_>>(), vec!["a", "b"]);

        assert!(tally.remove("a"));
        assert!(!tally.remove("a"));
        tally.incr("a", 2).unwrap();
        assert_eq!(tally.count("a"), Number::I64(2));

        tally.reset();
        assert!(tally.is_empty());
        assert_eq!(tally.count("b"), Number::I64(0));
    }

    #[test]
    fn ratio_rounding() {
        assert_eq!(ratio(1, 3), Some(33.33));
        assert_eq!(ratio(2, 3), Some(66.67));
        assert_eq!(ratio(1, 4), Some(25.0));
        assert_eq!(ratio(3, 3), Some(100.0));
        assert_eq!(ratio(1, 0), None);
        assert_eq!(ratio(1.5, 2), Some(75.0));
    }
}
