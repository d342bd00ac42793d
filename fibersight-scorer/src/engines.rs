//! The four sub-score engines.
//!
//! Each engine consumes percentile-normalised columns over the full tract
//! population and returns one 0-100 score per tract as a fixed weighted
//! sum. The weights are part of the scoring contract, not configuration.
#![forbid(unsafe_code)]

use std::cmp::Ordering;

use fibersight_core::{
    Direction, DerivedMetrics, RuralityCode, TractRecord, percentile_fractions, percentile_scores,
};

/// Income below this threshold halves the demand income component.
const LOW_INCOME_THRESHOLD: f64 = 30_000.0;
/// Multiplier applied to the income percentile of low-income tracts.
const LOW_INCOME_PENALTY: f64 = 0.5;

/// Sweet-spot scores per rurality code. Metro cores are saturated, remote
/// rural is expensive to trench; metro-adjacent small towns score highest.
const RURALITY_SWEET_SPOT: [(u8, f64); 9] = [
    (1, 20.0),
    (2, 35.0),
    (3, 55.0),
    (4, 85.0),
    (5, 75.0),
    (6, 90.0),
    (7, 70.0),
    (8, 60.0),
    (9, 40.0),
];
/// Score for tracts whose county has no rurality classification.
const RURALITY_NEUTRAL: f64 = 50.0;

/// Upper bounds (exclusive) on the BSL-count percentile fraction and the
/// bucket score below each bound. Fractions at or above the last bound get
/// [`DENSITY_TOP_SCORE`].
const DENSITY_BUCKETS: [(f64, f64); 4] = [(0.1, 20.0), (0.3, 50.0), (0.7, 85.0), (0.9, 60.0)];
/// Bucket score for the densest decile.
const DENSITY_TOP_SCORE: f64 = 30.0;

fn column<T>(items: &[T], extract: impl Fn(&T) -> Option<f64>) -> Vec<Option<f64>> {
    items.iter().map(extract).collect()
}

/// Weighted sum of pre-normalised component vectors.
fn blend(parts: &[(f64, Vec<f64>)]) -> Vec<f64> {
    let len = parts.first().map_or(0, |(_, scores)| scores.len());
    (0..len)
        .map(|index| {
            parts
                .iter()
                .map(|(weight, scores)| {
                    weight * scores.get(index).copied().unwrap_or_default()
                })
                .sum()
        })
        .collect()
}

/// Supply gap: how much room is left for a fiber entrant.
pub(crate) fn supply_gap(records: &[TractRecord], metrics: &[DerivedMetrics]) -> Vec<f64> {
    let fiber_providers = percentile_scores(
        &column(records, |r| Some(r.unique_providers_fiber)),
        Direction::LowerIsBetter,
    );
    let no_fiber = percentile_scores(
        &column(metrics, |m| m.pct_no_fiber),
        Direction::HigherIsBetter,
    );
    let unserved_combined = percentile_scores(
        &column(metrics, |m| m.pct_unserved_underserved),
        Direction::HigherIsBetter,
    );
    let copper = percentile_scores(
        &column(metrics, |m| m.pct_copper_served),
        Direction::HigherIsBetter,
    );
    let providers = percentile_scores(
        &column(records, |r| Some(r.unique_providers)),
        Direction::LowerIsBetter,
    );
    blend(&[
        (0.30, fiber_providers),
        (0.25, no_fiber),
        (0.20, unserved_combined),
        (0.15, copper),
        (0.10, providers),
    ])
}

/// Demand signal: will households buy service once it exists.
pub(crate) fn demand_signal(records: &[TractRecord], metrics: &[DerivedMetrics]) -> Vec<f64> {
    let income = income_component(records);
    let bsls = percentile_scores(
        &column(records, |r| Some(r.total_bsls)),
        Direction::HigherIsBetter,
    );
    let cellular_only = percentile_scores(
        &column(metrics, |m| m.pct_cellular_only),
        Direction::HigherIsBetter,
    );
    let adoption_gap = percentile_scores(
        &column(metrics, |m| m.adoption_gap.map(|gap| gap.max(0.0))),
        Direction::HigherIsBetter,
    );
    let population = percentile_scores(
        &column(records, |r| Some(r.total_population)),
        Direction::HigherIsBetter,
    );
    blend(&[
        (0.30, income),
        (0.25, bsls),
        (0.20, cellular_only),
        (0.15, adoption_gap),
        (0.10, population),
    ])
}

/// Income percentile with median imputation and a post-normalisation
/// penalty for tracts unlikely to sustain subscriptions.
pub(crate) fn income_component(records: &[TractRecord]) -> Vec<f64> {
    let fallback = median(records.iter().filter_map(|r| r.median_hh_income));
    let filled: Vec<Option<f64>> = records
        .iter()
        .map(|r| r.median_hh_income.or(fallback))
        .collect();
    let mut scores = percentile_scores(&filled, Direction::HigherIsBetter);
    for (score, income) in scores.iter_mut().zip(filled.iter()) {
        if let Some(value) = income
            && *value < LOW_INCOME_THRESHOLD
        {
            *score *= LOW_INCOME_PENALTY;
        }
    }
    scores
}

/// Funding tailwind: concentration of subsidy-eligible locations.
pub(crate) fn funding_tailwind(records: &[TractRecord], metrics: &[DerivedMetrics]) -> Vec<f64> {
    let unserved_count = percentile_scores(
        &column(records, |r| Some(r.unserved_bsls)),
        Direction::HigherIsBetter,
    );
    let pct_unserved = percentile_scores(
        &column(metrics, |m| m.pct_unserved),
        Direction::HigherIsBetter,
    );
    let underserved_count = percentile_scores(
        &column(records, |r| Some(r.underserved_bsls)),
        Direction::HigherIsBetter,
    );
    let unserved_combined = percentile_scores(
        &column(metrics, |m| m.pct_unserved_underserved),
        Direction::HigherIsBetter,
    );
    blend(&[
        (0.30, unserved_count),
        (0.30, pct_unserved),
        (0.20, underserved_count),
        (0.20, unserved_combined),
    ])
}

/// Build feasibility: profitable to build, not already owned by incumbents.
pub(crate) fn build_feasibility(records: &[TractRecord]) -> Vec<f64> {
    let rurality: Vec<f64> = records
        .iter()
        .map(|r| rurality_score(r.rurality))
        .collect();
    let density: Vec<f64> = percentile_fractions(&column(records, |r| Some(r.total_bsls)))
        .into_iter()
        .map(density_bucket)
        .collect();
    let providers = percentile_scores(
        &column(records, |r| Some(r.unique_providers)),
        Direction::LowerIsBetter,
    );
    blend(&[(0.40, rurality), (0.35, density), (0.25, providers)])
}

/// Look up the sweet-spot score for a rurality code; unmapped counties
/// score neutral.
pub(crate) fn rurality_score(code: Option<RuralityCode>) -> f64 {
    code.and_then(|value| {
        RURALITY_SWEET_SPOT
            .iter()
            .find(|(key, _)| *key == value.get())
            .map(|(_, score)| *score)
    })
    .unwrap_or(RURALITY_NEUTRAL)
}

/// Step function over the BSL-count percentile fraction.
pub(crate) fn density_bucket(fraction: f64) -> f64 {
    DENSITY_BUCKETS
        .iter()
        .find(|(bound, _)| fraction < *bound)
        .map_or(DENSITY_TOP_SCORE, |(_, score)| *score)
}

/// Median of the finite values in the iterator, averaging the two middle
/// elements for even counts.
fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.filter(|value| value.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let lower = sorted.get(mid.wrapping_sub(1)).copied()?;
        let upper = sorted.get(mid).copied()?;
        Some((lower + upper) / 2.0)
    } else {
        sorted.get(mid).copied()
    }
}
