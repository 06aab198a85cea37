//! Column range clamping for tracked views

use link_ai::backend::analytics::types::{clamp_to, MAX_INT, MAX_SMALLINT};
use proptest::prelude::*;

proptest! {
    #[test]
    fn clamp_stays_in_column_range(value in any::<f64>()) {
        let small = clamp_to(Some(value), MAX_SMALLINT).unwrap_or_default();
        prop_assert!((0..=MAX_SMALLINT).contains(&small));

        let int = clamp_to(Some(value), MAX_INT).unwrap_or_default();
        prop_assert!((0..=MAX_INT).contains(&int));
    }

    #[test]
    fn in_range_values_pass_through(value in 0i64..=MAX_SMALLINT) {
        prop_assert_eq!(clamp_to(Some(value as f64), MAX_SMALLINT), Some(value));
    }

    #[test]
    fn fractions_are_truncated(whole in 0i64..1000, fraction in 0.0f64..0.99) {
        prop_assert_eq!(clamp_to(Some(whole as f64 + fraction), MAX_INT), Some(whole));
    }
}

#[test]
fn missing_value_stays_missing() {
    assert_eq!(clamp_to(None, MAX_INT), None);
}
