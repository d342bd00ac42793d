//! The tract record and its derived metrics.
//!
//! A [`TractRecord`] holds the merged raw columns from the three source
//! tables. Counts are modelled as `f64` because every downstream use is a
//! ratio or a percentile rank; values that can legitimately be absent
//! (median income, the county rurality classification) are [`Option`]s.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geoid::{CountyId, Geoid};

/// Error returned when a rurality code falls outside the 1-9 scale.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("rurality code {code} is outside the 1-9 scale")]
pub struct RuralityCodeError {
    /// Offending code value.
    pub code: u8,
}

/// USDA rural-urban continuum code: 1 (dense metro) through 9 (remote rural).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuralityCode(u8);

impl RuralityCode {
    /// Validate and construct a rurality code.
    ///
    /// # Errors
    /// Returns [`RuralityCodeError`] when the code is not in `1..=9`.
    pub const fn new(code: u8) -> Result<Self, RuralityCodeError> {
        if matches!(code, 1..=9) {
            Ok(Self(code))
        } else {
            Err(RuralityCodeError { code })
        }
    }

    /// Return the raw code value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// One Census tract after the three-way merge, before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct TractRecord {
    /// Eleven-digit tract identifier.
    pub geoid: Geoid,
    /// Identifier of the containing county (first five GEOID digits).
    pub county: CountyId,
    /// Two-letter state abbreviation.
    pub state: String,
    /// County display name.
    pub county_name: String,

    /// Total tract population.
    pub total_population: f64,
    /// Total households.
    pub hh_total: f64,
    /// Households with a broadband subscription of any type.
    pub hh_broadband_any: f64,
    /// Households whose only internet is a cellular data plan.
    pub hh_cellular_only: f64,
    /// Households with cable, fiber, or DSL service.
    pub hh_cable_fiber_dsl: f64,
    /// Households with no internet access at all.
    pub hh_no_internet: f64,
    /// Median household income; `None` when the Census marks it unavailable.
    pub median_hh_income: Option<f64>,
    /// Population 25+ in the educational attainment universe.
    pub edu_total_25plus: f64,
    /// Count with a bachelor's degree.
    pub edu_bachelors: f64,
    /// Count with a master's degree.
    pub edu_masters: f64,
    /// Count with a professional degree.
    pub edu_professional: f64,
    /// Count with a doctorate.
    pub edu_doctorate: f64,
    /// Civilian labour force size.
    pub emp_civilian_labor: f64,
    /// Unemployed count within the civilian labour force.
    pub emp_unemployed: f64,
    /// Total population in the race/ethnicity universe.
    pub race_total: f64,
    /// Non-Hispanic white population.
    pub race_nh_white: f64,
    /// Households in the computer-ownership universe.
    pub comp_total_hh: f64,
    /// Households with no computer.
    pub comp_no_computer: f64,

    /// Total broadband-serviceable locations.
    pub total_bsls: f64,
    /// BSLs with no qualifying service.
    pub unserved_bsls: f64,
    /// BSLs served below the modern standard.
    pub underserved_bsls: f64,
    /// BSLs with qualifying service.
    pub served_bsls: f64,
    /// Unserved BSLs in copper footprints.
    pub unserved_bsls_copper: f64,
    /// Underserved BSLs in copper footprints.
    pub underserved_bsls_copper: f64,
    /// BSLs served over copper.
    pub served_bsls_copper: f64,
    /// Unserved BSLs in cable footprints.
    pub unserved_bsls_cable: f64,
    /// Underserved BSLs in cable footprints.
    pub underserved_bsls_cable: f64,
    /// BSLs served over cable.
    pub served_bsls_cable: f64,
    /// Unserved BSLs in fiber footprints.
    pub unserved_bsls_fiber: f64,
    /// Underserved BSLs in fiber footprints.
    pub underserved_bsls_fiber: f64,
    /// BSLs served over fiber.
    pub served_bsls_fiber: f64,
    /// Unserved BSLs in licensed fixed-wireless footprints.
    pub unserved_bsls_ltfw: f64,
    /// Underserved BSLs in licensed fixed-wireless footprints.
    pub underserved_bsls_ltfw: f64,
    /// BSLs served over licensed fixed wireless.
    pub served_bsls_ltfw: f64,
    /// Unique providers of any technology.
    pub unique_providers: f64,
    /// Unique copper providers.
    pub unique_providers_copper: f64,
    /// Unique cable providers.
    pub unique_providers_cable: f64,
    /// Unique fiber providers.
    pub unique_providers_fiber: f64,
    /// Unique licensed fixed-wireless providers.
    pub unique_providers_ltfw: f64,

    /// County rurality classification; `None` when the county is unmapped.
    pub rurality: Option<RuralityCode>,
    /// County population from the rurality table.
    pub county_population: Option<f64>,
}

/// Row-wise ratio, gap, and density metrics computed from raw counts.
///
/// All percentage fields are on a 0-100 scale. A `None` marks a ratio whose
/// denominator was zero; ratios are deliberately not clamped when upstream
/// count anomalies push them past 100.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedMetrics {
    /// Unserved BSLs as a percentage of total BSLs.
    pub pct_unserved: Option<f64>,
    /// Underserved BSLs as a percentage of total BSLs.
    pub pct_underserved: Option<f64>,
    /// Unserved plus underserved BSLs as a percentage of total BSLs.
    pub pct_unserved_underserved: Option<f64>,
    /// Unserved fiber-footprint BSLs as a percentage of total BSLs.
    pub pct_fiber_unserved: Option<f64>,
    /// BSLs without fiber service as a percentage of total BSLs.
    pub pct_no_fiber: Option<f64>,
    /// Copper-served BSLs as a percentage of total BSLs.
    pub pct_copper_served: Option<f64>,
    /// Whether at least one fiber provider reports service.
    pub has_fiber: bool,

    /// Households with no internet as a percentage of households.
    pub pct_no_internet: Option<f64>,
    /// Cellular-only households as a percentage of households.
    pub pct_cellular_only: Option<f64>,
    /// Households with any broadband as a percentage of households.
    pub pct_broadband: Option<f64>,
    /// Cable/fiber/DSL households as a percentage of households.
    pub pct_cable_fiber_dsl: Option<f64>,
    /// Served BSLs as a percentage of total BSLs.
    pub pct_served: Option<f64>,
    /// Availability minus adoption: `pct_served - pct_broadband`. May be
    /// negative; the demand engine clips it at zero before ranking.
    pub adoption_gap: Option<f64>,

    /// Bachelor's degree or higher as a percentage of population 25+.
    pub pct_bachelors_plus: Option<f64>,
    /// Unemployed as a percentage of the civilian labour force.
    pub unemployment_rate: Option<f64>,
    /// Non-white or Hispanic population as a percentage of the race universe.
    pub pct_minority: Option<f64>,

    /// Households per BSL, a housing density proxy (not a percentage).
    pub hh_per_bsl: Option<f64>,
    /// Households without a computer as a percentage of the universe.
    pub pct_no_computer: Option<f64>,
}
