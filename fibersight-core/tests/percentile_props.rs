//! Property coverage for the percentile normalisation primitive.

use fibersight_core::{Direction, percentile_fractions, percentile_scores};
use proptest::prelude::*;

fn optional_column() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(
        prop::option::weighted(0.8, -1.0e6_f64..1.0e6_f64),
        1..64,
    )
}

proptest! {
    /// Scores stay in `0..=100` for both orientations.
    #[test]
    fn scores_are_bounded(column in optional_column()) {
        for direction in [Direction::HigherIsBetter, Direction::LowerIsBetter] {
            for score in percentile_scores(&column, direction) {
                prop_assert!((0.0..=100.0).contains(&score));
            }
        }
    }

    /// The two orientations are exact complements, pointwise.
    #[test]
    fn orientations_are_complements(column in optional_column()) {
        let ascending = percentile_scores(&column, Direction::HigherIsBetter);
        let descending = percentile_scores(&column, Direction::LowerIsBetter);
        for (asc, desc) in ascending.iter().zip(descending.iter()) {
            prop_assert!((asc + desc - 100.0).abs() < 1e-9);
        }
    }

    /// Normalisation is deterministic over identical input.
    #[test]
    fn fractions_are_deterministic(column in optional_column()) {
        prop_assert_eq!(percentile_fractions(&column), percentile_fractions(&column));
    }

    /// Larger present values never rank below smaller ones.
    #[test]
    fn fractions_respect_ordering(column in optional_column()) {
        let fractions = percentile_fractions(&column);
        let cells: Vec<Option<f64>> = column;
        for (i, left) in cells.iter().enumerate() {
            for (j, right) in cells.iter().enumerate() {
                if let (Some(a), Some(b)) = (left, right)
                    && a > b
                {
                    let fi = fractions.get(i).copied().unwrap_or_default();
                    let fj = fractions.get(j).copied().unwrap_or_default();
                    prop_assert!(fi > fj);
                }
            }
        }
    }
}
