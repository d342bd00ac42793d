//! Score, rank, tier, and rollup types produced by the pipeline.
#![forbid(unsafe_code)]

use std::fmt;

use serde::Serialize;

use crate::geoid::CountyId;
use crate::tract::{DerivedMetrics, RuralityCode, TractRecord};

/// The four weighted sub-scores, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    /// Room left for fiber: few fiber providers, copper dependency,
    /// unserved concentration.
    pub supply_gap: f64,
    /// Likelihood of take-up: income, density, cellular-only reliance,
    /// adoption gap.
    pub demand_signal: f64,
    /// Concentration of subsidy-eligible unserved and underserved locations.
    pub funding_tailwind: f64,
    /// Buildability: rurality sweet spot, moderate density, light
    /// competition.
    pub build_feasibility: f64,
}

/// Ordinal opportunity tier derived from the composite score.
///
/// Bins are right-inclusive: a composite of exactly 50.0 is
/// [`Tier::BelowAverage`], exactly 80.0 is [`Tier::High`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tier {
    /// Composite in `(-inf, 30]`.
    #[serde(rename = "Low")]
    Low,
    /// Composite in `(30, 50]`.
    #[serde(rename = "Below Average")]
    BelowAverage,
    /// Composite in `(50, 65]`.
    #[serde(rename = "Moderate")]
    Moderate,
    /// Composite in `(65, 80]`.
    #[serde(rename = "High")]
    High,
    /// Composite in `(80, +inf)`.
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Tier {
    /// Bucket a composite score into its tier.
    ///
    /// Percentile-derived composites always land in `(0, 100]`; anything at
    /// or below 30 is `Low`, anything above 80 is `VeryHigh`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score <= 30.0 {
            Self::Low
        } else if score <= 50.0 {
            Self::BelowAverage
        } else if score <= 65.0 {
            Self::Moderate
        } else if score <= 80.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    /// Human-readable tier label, matching the serialised form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::BelowAverage => "Below Average",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// A fully scored tract: raw record, derived metrics, scores, rank, tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTract {
    /// Merged raw columns.
    pub record: TractRecord,
    /// Derived ratio and density metrics.
    pub metrics: DerivedMetrics,
    /// The four weighted sub-scores.
    pub scores: SubScores,
    /// Weighted composite opportunity score in `0..=100`.
    pub opportunity_score: f64,
    /// Dense descending rank; 1 is the highest composite, ties share a rank.
    pub opportunity_rank: u32,
    /// Ordinal tier for the composite score.
    pub opportunity_tier: Tier,
}

/// Read-only county-level aggregation of scored tracts.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyRollup {
    /// Two-letter state abbreviation.
    pub state: String,
    /// County display name.
    pub county_name: String,
    /// Five-digit county identifier.
    pub county: CountyId,
    /// County rurality classification, when mapped.
    pub rurality: Option<RuralityCode>,
    /// Number of scored tracts in the county.
    pub tract_count: u32,
    /// Mean composite score across the county's tracts.
    pub mean_score: f64,
    /// Highest composite score in the county.
    pub max_score: f64,
    /// Summed broadband-serviceable locations.
    pub total_bsls: f64,
    /// Summed unserved locations.
    pub total_unserved: f64,
    /// Mean median household income over tracts that report one.
    pub mean_income: Option<f64>,
    /// Mean percentage of BSLs without fiber, over tracts with a value.
    pub mean_no_fiber_pct: Option<f64>,
}
