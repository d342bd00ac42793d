//! Rank-based percentile normalisation.
//!
//! Every scoring engine shares one primitive: convert a raw numeric column
//! into percentile positions across the full tract population. Ties share
//! the average of the ranks they span, and missing values sort below every
//! real value so absent data never inflates a score. Weighting decisions
//! live entirely in the callers.
#![forbid(unsafe_code)]

use std::cmp::Ordering;

/// Orientation of a raw column relative to opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Higher raw values earn higher scores.
    HigherIsBetter,
    /// Lower raw values earn higher scores; the percentile is inverted.
    LowerIsBetter,
}

/// Treat `None` and non-finite values uniformly as missing.
fn cell(values: &[Option<f64>], index: usize) -> Option<f64> {
    values
        .get(index)
        .copied()
        .flatten()
        .filter(|value| value.is_finite())
}

fn compare_cells(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compute percentile fractions in `(0, 1]` for a column of optional values.
///
/// Each value receives `average_rank / n`, where ranks are one-based over
/// the ascending sort of the column. Tied values (including all missing
/// values, which tie with one another below every real value) share the
/// average of the ranks in their group. The result is positionally aligned
/// with the input.
#[must_use]
pub fn percentile_fractions(values: &[Option<f64>]) -> Vec<f64> {
    let len = values.len();
    if len == 0 {
        return Vec::new();
    }
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| compare_cells(cell(values, a), cell(values, b)));

    let mut fractions = vec![0.0_f64; len];
    let total = len as f64;
    let mut group_start = 0_usize;
    while group_start < len {
        let group_value = order
            .get(group_start)
            .and_then(|&index| cell(values, index));
        let mut group_end = group_start + 1;
        while group_end < len {
            let next = order
                .get(group_end)
                .and_then(|&index| cell(values, index));
            if compare_cells(group_value, next) != Ordering::Equal {
                break;
            }
            group_end += 1;
        }
        // One-based ranks group_start+1 ..= group_end average to their midpoint.
        let average_rank = ((group_start + 1 + group_end) as f64) / 2.0;
        let fraction = average_rank / total;
        for &index in order.get(group_start..group_end).unwrap_or_default() {
            if let Some(slot) = fractions.get_mut(index) {
                *slot = fraction;
            }
        }
        group_start = group_end;
    }
    fractions
}

/// Normalise a column of optional values into `0..=100` percentile scores.
///
/// With [`Direction::LowerIsBetter`] the fraction is inverted (`1 - p`)
/// before scaling, so the two orientations are exact complements:
/// `score_desc = 100 - score_asc` pointwise.
///
/// # Examples
///
/// ```
/// use fibersight_core::{Direction, percentile_scores};
///
/// let column = [Some(10.0), Some(40.0), Some(20.0), Some(30.0)];
/// let scores = percentile_scores(&column, Direction::HigherIsBetter);
/// assert_eq!(scores, vec![25.0, 100.0, 50.0, 75.0]);
/// ```
#[must_use]
pub fn percentile_scores(values: &[Option<f64>], direction: Direction) -> Vec<f64> {
    percentile_fractions(values)
        .into_iter()
        .map(|fraction| match direction {
            Direction::HigherIsBetter => fraction * 100.0,
            Direction::LowerIsBetter => (1.0 - fraction) * 100.0,
        })
        .collect()
}
