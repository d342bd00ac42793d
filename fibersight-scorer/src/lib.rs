//! Scoring pipeline for fiber build opportunity.
//!
//! Given the merged tract records produced by the dataset loader, this crate
//! runs the deterministic, in-memory scoring pipeline:
//!
//! 1. derive per-row ratio and density metrics;
//! 2. compute the four weighted sub-scores (supply gap, demand signal,
//!    funding tailwind, build feasibility) from percentile-normalised
//!    columns;
//! 3. blend them into the composite opportunity score, assign dense
//!    descending ranks and ordinal tiers, and aggregate a county rollup.
//!
//! The pipeline has no I/O and no randomness: identical inputs always yield
//! identical outputs.
//!
//! # Examples
//!
//! ```no_run
//! use fibersight_scorer::score_tracts;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let records = Vec::new();
//! let outcome = score_tracts(records)?;
//! for tract in outcome.tracts.iter().take(20) {
//!     println!("#{} {}", tract.opportunity_rank, tract.record.geoid);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use fibersight_core::{CountyRollup, ScoredTract, SubScores, Tier, TractRecord};

mod composite;
mod engines;
mod error;
mod metrics;

pub use error::ScoreError;
pub use metrics::derive_metrics;

/// Result of a full scoring run: ranked tracts plus the county rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    /// Scored tracts ordered by descending composite (ties by GEOID).
    pub tracts: Vec<ScoredTract>,
    /// County aggregation ordered by descending mean composite.
    pub counties: Vec<CountyRollup>,
}

/// Score a merged tract population end to end.
///
/// # Errors
/// Returns [`ScoreError::NoTracts`] when the input is empty; percentile
/// normalisation is meaningless without a population to rank within.
pub fn score_tracts(records: Vec<TractRecord>) -> Result<ScoreOutcome, ScoreError> {
    if records.is_empty() {
        return Err(ScoreError::NoTracts);
    }
    let metrics: Vec<_> = records.iter().map(derive_metrics).collect();

    let supply = engines::supply_gap(&records, &metrics);
    let demand = engines::demand_signal(&records, &metrics);
    let funding = engines::funding_tailwind(&records, &metrics);
    let feasibility = engines::build_feasibility(&records);

    let mut tracts: Vec<ScoredTract> = records
        .into_iter()
        .zip(metrics)
        .enumerate()
        .map(|(index, (record, tract_metrics))| {
            let scores = SubScores {
                supply_gap: component(&supply, index),
                demand_signal: component(&demand, index),
                funding_tailwind: component(&funding, index),
                build_feasibility: component(&feasibility, index),
            };
            let opportunity_score = composite::blend_composite(&scores);
            ScoredTract {
                record,
                metrics: tract_metrics,
                scores,
                opportunity_score,
                opportunity_rank: 0,
                opportunity_tier: Tier::from_score(opportunity_score),
            }
        })
        .collect();

    composite::assign_dense_ranks(&mut tracts);
    let counties = composite::county_rollup(&tracts);

    log::info!(
        "scored {} tracts across {} counties",
        tracts.len(),
        counties.len()
    );
    Ok(ScoreOutcome { tracts, counties })
}

fn component(scores: &[f64], index: usize) -> f64 {
    scores.get(index).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests;
