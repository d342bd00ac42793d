//! Row-wise derived metrics feeding the scoring engines.
//!
//! Every function here is a pure computation over one record. Ratios with a
//! zero denominator become `None` instead of propagating infinities or NaN
//! into the percentile ranks, and percentages past 100 from upstream count
//! anomalies are passed through unclamped.
#![forbid(unsafe_code)]

use fibersight_core::{DerivedMetrics, TractRecord};

/// Express `numerator / denominator` as a 0-100 percentage, or `None` when
/// the denominator is not strictly positive.
fn pct(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator * 100.0)
}

/// Plain ratio with the same zero-denominator guard, no percentage scaling.
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator)
}

/// Compute the full set of derived metrics for one tract.
#[must_use]
pub fn derive_metrics(record: &TractRecord) -> DerivedMetrics {
    let total_bsls = record.total_bsls;
    let hh_total = record.hh_total;

    let pct_served = pct(record.served_bsls, total_bsls);
    let pct_broadband = pct(record.hh_broadband_any, hh_total);
    let adoption_gap = match (pct_served, pct_broadband) {
        (Some(served), Some(subscribed)) => Some(served - subscribed),
        _ => None,
    };

    let bachelors_plus = record.edu_bachelors
        + record.edu_masters
        + record.edu_professional
        + record.edu_doctorate;

    DerivedMetrics {
        pct_unserved: pct(record.unserved_bsls, total_bsls),
        pct_underserved: pct(record.underserved_bsls, total_bsls),
        pct_unserved_underserved: pct(record.unserved_bsls + record.underserved_bsls, total_bsls),
        pct_fiber_unserved: pct(record.unserved_bsls_fiber, total_bsls),
        pct_no_fiber: pct(total_bsls - record.served_bsls_fiber, total_bsls),
        pct_copper_served: pct(record.served_bsls_copper, total_bsls),
        has_fiber: record.unique_providers_fiber > 0.0,

        pct_no_internet: pct(record.hh_no_internet, hh_total),
        pct_cellular_only: pct(record.hh_cellular_only, hh_total),
        pct_broadband,
        pct_cable_fiber_dsl: pct(record.hh_cable_fiber_dsl, hh_total),
        pct_served,
        adoption_gap,

        pct_bachelors_plus: pct(bachelors_plus, record.edu_total_25plus),
        unemployment_rate: pct(record.emp_unemployed, record.emp_civilian_labor),
        pct_minority: pct(record.race_total - record.race_nh_white, record.race_total),

        hh_per_bsl: ratio(hh_total, total_bsls),
        pct_no_computer: pct(record.comp_no_computer, record.comp_total_hh),
    }
}
