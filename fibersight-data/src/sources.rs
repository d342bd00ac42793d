//! Typed rows for the three CSV sources.
//!
//! Field names and renames match the columns emitted by the upstream data
//! pulls; unknown columns in the files are ignored during deserialisation.
#![forbid(unsafe_code)]

use serde::Deserialize;

/// One tract row from the Census ACS demographic table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DemographicRow {
    /// Eleven-digit tract GEOID, zero-padded.
    #[serde(rename = "GEOID")]
    pub geoid: String,
    /// Total tract population.
    pub total_population: f64,
    /// Total households.
    pub hh_total: f64,
    /// Households with any broadband subscription.
    pub hh_broadband_any: f64,
    /// Cellular-only households.
    pub hh_cellular_only: f64,
    /// Cable/fiber/DSL households.
    pub hh_cable_fiber_dsl: f64,
    /// Households with no internet access.
    pub hh_no_internet: f64,
    /// Median household income; may be empty or the Census sentinel.
    pub median_hh_income: Option<f64>,
    /// Population 25+ in the education universe.
    pub edu_total_25plus: f64,
    /// Bachelor's degree count.
    pub edu_bachelors: f64,
    /// Master's degree count.
    pub edu_masters: f64,
    /// Professional degree count.
    pub edu_professional: f64,
    /// Doctorate count.
    pub edu_doctorate: f64,
    /// Civilian labour force size.
    pub emp_civilian_labor: f64,
    /// Unemployed count.
    pub emp_unemployed: f64,
    /// Race/ethnicity universe total.
    pub race_total: f64,
    /// Non-Hispanic white count.
    pub race_nh_white: f64,
    /// Computer-ownership universe households.
    pub comp_total_hh: f64,
    /// Households without a computer.
    pub comp_no_computer: f64,
}

/// One tract row from the FCC broadband availability table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupplyRow {
    /// Eleven-digit tract GEOID, zero-padded.
    #[serde(rename = "GEOID")]
    pub geoid: String,
    /// Two-letter state abbreviation.
    #[serde(rename = "StateAbbr")]
    pub state: String,
    /// County display name.
    #[serde(rename = "CountyName")]
    pub county_name: String,
    /// Total broadband-serviceable locations.
    #[serde(rename = "TotalBSLs")]
    pub total_bsls: f64,
    /// BSLs with no qualifying service.
    #[serde(rename = "UnservedBSLs")]
    pub unserved_bsls: f64,
    /// BSLs served below the modern standard.
    #[serde(rename = "UnderservedBSLs")]
    pub underserved_bsls: f64,
    /// BSLs with qualifying service.
    #[serde(rename = "ServedBSLs")]
    pub served_bsls: f64,
    /// Unserved BSLs in copper footprints.
    #[serde(rename = "UnservedBSLsCopper")]
    pub unserved_bsls_copper: f64,
    /// Underserved BSLs in copper footprints.
    #[serde(rename = "UnderservedBSLsCopper")]
    pub underserved_bsls_copper: f64,
    /// BSLs served over copper.
    #[serde(rename = "ServedBSLsCopper")]
    pub served_bsls_copper: f64,
    /// Unserved BSLs in cable footprints.
    #[serde(rename = "UnservedBSLsCable")]
    pub unserved_bsls_cable: f64,
    /// Underserved BSLs in cable footprints.
    #[serde(rename = "UnderservedBSLsCable")]
    pub underserved_bsls_cable: f64,
    /// BSLs served over cable.
    #[serde(rename = "ServedBSLsCable")]
    pub served_bsls_cable: f64,
    /// Unserved BSLs in fiber footprints.
    #[serde(rename = "UnservedBSLsFiber")]
    pub unserved_bsls_fiber: f64,
    /// Underserved BSLs in fiber footprints.
    #[serde(rename = "UnderservedBSLsFiber")]
    pub underserved_bsls_fiber: f64,
    /// BSLs served over fiber.
    #[serde(rename = "ServedBSLsFiber")]
    pub served_bsls_fiber: f64,
    /// Unserved BSLs in licensed fixed-wireless footprints.
    #[serde(rename = "UnservedBSLsLTFW")]
    pub unserved_bsls_ltfw: f64,
    /// Underserved BSLs in licensed fixed-wireless footprints.
    #[serde(rename = "UnderservedBSLsLTFW")]
    pub underserved_bsls_ltfw: f64,
    /// BSLs served over licensed fixed wireless.
    #[serde(rename = "ServedBSLsLTFW")]
    pub served_bsls_ltfw: f64,
    /// Unique providers of any technology.
    #[serde(rename = "UniqueProviders")]
    pub unique_providers: f64,
    /// Unique copper providers.
    #[serde(rename = "UniqueProvidersCopper")]
    pub unique_providers_copper: f64,
    /// Unique cable providers.
    #[serde(rename = "UniqueProvidersCable")]
    pub unique_providers_cable: f64,
    /// Unique fiber providers.
    #[serde(rename = "UniqueProvidersFiber")]
    pub unique_providers_fiber: f64,
    /// Unique licensed fixed-wireless providers.
    #[serde(rename = "UniqueProvidersLTFW")]
    pub unique_providers_ltfw: f64,
}

/// One county row from the USDA rural-urban continuum table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuralityRow {
    /// County FIPS code; the upstream table stores it as an integer, so
    /// leading zeroes may be missing.
    #[serde(rename = "FIPS")]
    pub fips: String,
    /// Rural-urban continuum code, 1-9.
    #[serde(rename = "RUCC_2023")]
    pub code: u8,
    /// County population.
    #[serde(rename = "Population_2020")]
    pub county_population: Option<f64>,
}
