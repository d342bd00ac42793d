//! Composite aggregation: weighting, ranking, tiering, county rollup.
#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::collections::BTreeMap;

use fibersight_core::{CountyId, CountyRollup, RuralityCode, ScoredTract, SubScores};

/// Weight of the supply gap sub-score in the composite.
const SUPPLY_GAP_WEIGHT: f64 = 0.40;
/// Weight of the demand signal sub-score in the composite.
const DEMAND_SIGNAL_WEIGHT: f64 = 0.30;
/// Weight of the funding tailwind sub-score in the composite.
const FUNDING_TAILWIND_WEIGHT: f64 = 0.15;
/// Weight of the build feasibility sub-score in the composite.
const BUILD_FEASIBILITY_WEIGHT: f64 = 0.15;

/// Blend the four sub-scores into the composite opportunity score.
pub(crate) fn blend_composite(scores: &SubScores) -> f64 {
    scores.supply_gap * SUPPLY_GAP_WEIGHT
        + scores.demand_signal * DEMAND_SIGNAL_WEIGHT
        + scores.funding_tailwind * FUNDING_TAILWIND_WEIGHT
        + scores.build_feasibility * BUILD_FEASIBILITY_WEIGHT
}

/// Sort tracts into the output order and assign dense descending ranks.
///
/// Ordering is descending composite with ties broken by ascending GEOID,
/// which keeps output byte-identical between runs. Equal composites share
/// a rank and the next distinct composite takes the next integer.
pub(crate) fn assign_dense_ranks(tracts: &mut [ScoredTract]) {
    tracts.sort_by(|a, b| {
        b.opportunity_score
            .partial_cmp(&a.opportunity_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.record.geoid.cmp(&b.record.geoid))
    });

    let mut rank = 0_u32;
    let mut previous: Option<f64> = None;
    for tract in tracts.iter_mut() {
        if previous != Some(tract.opportunity_score) {
            rank += 1;
            previous = Some(tract.opportunity_score);
        }
        tract.opportunity_rank = rank;
    }
}

struct CountyAccumulator {
    state: String,
    county_name: String,
    rurality: Option<RuralityCode>,
    tract_count: u32,
    score_sum: f64,
    max_score: f64,
    total_bsls: f64,
    total_unserved: f64,
    income_sum: f64,
    income_count: u32,
    no_fiber_sum: f64,
    no_fiber_count: u32,
}

impl CountyAccumulator {
    fn new(tract: &ScoredTract) -> Self {
        Self {
            state: tract.record.state.clone(),
            county_name: tract.record.county_name.clone(),
            rurality: tract.record.rurality,
            tract_count: 0,
            score_sum: 0.0,
            max_score: f64::MIN,
            total_bsls: 0.0,
            total_unserved: 0.0,
            income_sum: 0.0,
            income_count: 0,
            no_fiber_sum: 0.0,
            no_fiber_count: 0,
        }
    }

    fn absorb(&mut self, tract: &ScoredTract) {
        self.tract_count += 1;
        self.score_sum += tract.opportunity_score;
        self.max_score = self.max_score.max(tract.opportunity_score);
        self.total_bsls += tract.record.total_bsls;
        self.total_unserved += tract.record.unserved_bsls;
        if let Some(income) = tract.record.median_hh_income {
            self.income_sum += income;
            self.income_count += 1;
        }
        if let Some(no_fiber) = tract.metrics.pct_no_fiber {
            self.no_fiber_sum += no_fiber;
            self.no_fiber_count += 1;
        }
    }

    fn finish(self, county: CountyId) -> CountyRollup {
        let mean_score = self.score_sum / f64::from(self.tract_count.max(1));
        CountyRollup {
            state: self.state,
            county_name: self.county_name,
            county,
            rurality: self.rurality,
            tract_count: self.tract_count,
            mean_score,
            max_score: self.max_score,
            total_bsls: self.total_bsls,
            total_unserved: self.total_unserved,
            mean_income: (self.income_count > 0)
                .then(|| self.income_sum / f64::from(self.income_count)),
            mean_no_fiber_pct: (self.no_fiber_count > 0)
                .then(|| self.no_fiber_sum / f64::from(self.no_fiber_count)),
        }
    }
}

/// Aggregate scored tracts into one row per county.
///
/// A read-only view over the scored output; nothing here feeds back into
/// tract scoring. Rows are ordered by descending mean composite with ties
/// broken by ascending county identifier.
pub(crate) fn county_rollup(tracts: &[ScoredTract]) -> Vec<CountyRollup> {
    let mut counties: BTreeMap<CountyId, CountyAccumulator> = BTreeMap::new();
    for tract in tracts {
        counties
            .entry(tract.record.county.clone())
            .or_insert_with(|| CountyAccumulator::new(tract))
            .absorb(tract);
    }

    let mut rollups: Vec<CountyRollup> = counties
        .into_iter()
        .map(|(county, accumulator)| accumulator.finish(county))
        .collect();
    rollups.sort_by(|a, b| {
        b.mean_score
            .partial_cmp(&a.mean_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.county.cmp(&b.county))
    });
    rollups
}
