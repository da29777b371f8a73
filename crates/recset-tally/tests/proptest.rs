//! Property-based tests for the tally registry.

use std::collections::HashSet;

use proptest::prelude::*;
use recset::Number;
use recset_tally::{ratio, Mode, Tally, TallyError};

proptest! {
    /// Distinct counts equal the number of different names added.
    #[test]
    fn distinct_count_matches_set_size(
        names in prop::collection::vec("[a-e]{1,2}", 0..60),
    ) {
        let mut tally = Tally::new();
        for name in &names {
            tally.add("names", name.as_str()).unwrap();
        }
        let expected: HashSet<&String> = names.iter().collect();
        prop_assert_eq!(tally.count("names").to_f64(), expected.len() as f64);
    }

    /// Non-negative integer steps sum exactly.
    #[test]
    fn sum_of_non_negative_steps(
        steps in prop::collection::vec(0i64..1000, 0..60),
    ) {
        let mut tally = Tally::new();
        for step in &steps {
            tally.incr("sum", *step).unwrap();
        }
        let expected: i64 = steps.iter().sum();
        prop_assert_eq!(tally.count("sum"), Number::I64(expected));
    }

    /// Once a category is used in one mode the other mode is rejected.
    #[test]
    fn modes_never_mix(first_is_distinct in any::<bool>()) {
        let mut tally = Tally::new();
        let result = if first_is_distinct {
            tally.add("c", "x").unwrap();
            tally.incr("c", 1)
        } else {
            tally.incr("c", 1).unwrap();
            tally.add("c", "x")
        };
        let is_conflict = matches!(result, Err(TallyError::ModeConflict { .. }));
        prop_assert!(is_conflict);
        let expected = if first_is_distinct { Mode::Distinct } else { Mode::Sum };
        prop_assert_eq!(tally.mode("c"), Some(expected));
    }

    /// Ratios of a part to a larger whole stay within 0..=100.
    #[test]
    fn ratio_is_a_percentage(whole in 1u64..10_000, part_fraction in 0.0f64..=1.0) {
        let part = (whole as f64 * part_fraction).floor();
        let percent = ratio(part, whole).unwrap();
        prop_assert!((0.0..=100.0).contains(&percent));
    }
}
