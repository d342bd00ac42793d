//! Persisting scored outputs: tract table, county rollup, run report.
//!
//! Column names are fixed; the map-rendering collaborator joins geometry on
//! `GEOID` and reads the score and metric columns by name.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use fibersight_core::{CountyRollup, ScoredTract};
use serde::Serialize;

use crate::error::OutputError;
use crate::fs::ensure_parent_dir;
use crate::loader::LoadReport;

/// Machine-readable summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Per-stage loader counts.
    pub load: LoadReport,
    /// Number of scored tracts.
    pub scored_tracts: usize,
    /// Number of counties in the rollup.
    pub counties: usize,
    /// Scored tract count per tier label.
    pub tier_counts: BTreeMap<String, usize>,
}

impl RunReport {
    /// Assemble the report from loader counts and the scored outputs.
    #[must_use]
    pub fn new(load: LoadReport, tracts: &[ScoredTract], counties: &[CountyRollup]) -> Self {
        let mut tier_counts = BTreeMap::new();
        for tract in tracts {
            *tier_counts
                .entry(tract.opportunity_tier.label().to_owned())
                .or_insert(0) += 1;
        }
        Self {
            load,
            scored_tracts: tracts.len(),
            counties: counties.len(),
            tier_counts,
        }
    }
}

#[derive(Debug, Serialize)]
struct TractScoreRow<'a> {
    #[serde(rename = "GEOID")]
    geoid: &'a str,
    #[serde(rename = "StateAbbr")]
    state: &'a str,
    #[serde(rename = "CountyName")]
    county_name: &'a str,
    county_geoid: &'a str,
    total_population: f64,
    hh_total: f64,
    median_hh_income: Option<f64>,
    #[serde(rename = "TotalBSLs")]
    total_bsls: f64,
    #[serde(rename = "UnservedBSLs")]
    unserved_bsls: f64,
    #[serde(rename = "UnderservedBSLs")]
    underserved_bsls: f64,
    #[serde(rename = "ServedBSLs")]
    served_bsls: f64,
    #[serde(rename = "UnservedBSLsCopper")]
    unserved_bsls_copper: f64,
    #[serde(rename = "UnderservedBSLsCopper")]
    underserved_bsls_copper: f64,
    #[serde(rename = "ServedBSLsCopper")]
    served_bsls_copper: f64,
    #[serde(rename = "UnservedBSLsCable")]
    unserved_bsls_cable: f64,
    #[serde(rename = "UnderservedBSLsCable")]
    underserved_bsls_cable: f64,
    #[serde(rename = "ServedBSLsCable")]
    served_bsls_cable: f64,
    #[serde(rename = "UnservedBSLsFiber")]
    unserved_bsls_fiber: f64,
    #[serde(rename = "UnderservedBSLsFiber")]
    underserved_bsls_fiber: f64,
    #[serde(rename = "ServedBSLsFiber")]
    served_bsls_fiber: f64,
    #[serde(rename = "UnservedBSLsLTFW")]
    unserved_bsls_ltfw: f64,
    #[serde(rename = "UnderservedBSLsLTFW")]
    underserved_bsls_ltfw: f64,
    #[serde(rename = "ServedBSLsLTFW")]
    served_bsls_ltfw: f64,
    #[serde(rename = "UniqueProviders")]
    unique_providers: f64,
    #[serde(rename = "UniqueProvidersCopper")]
    unique_providers_copper: f64,
    #[serde(rename = "UniqueProvidersCable")]
    unique_providers_cable: f64,
    #[serde(rename = "UniqueProvidersFiber")]
    unique_providers_fiber: f64,
    #[serde(rename = "UniqueProvidersLTFW")]
    unique_providers_ltfw: f64,
    rucc_code: Option<u8>,
    county_pop_2020: Option<f64>,
    pct_unserved: Option<f64>,
    pct_underserved: Option<f64>,
    pct_unserved_underserved: Option<f64>,
    pct_fiber_unserved: Option<f64>,
    pct_no_fiber: Option<f64>,
    pct_copper_served: Option<f64>,
    has_fiber: u8,
    pct_no_internet: Option<f64>,
    pct_cellular_only: Option<f64>,
    pct_broadband: Option<f64>,
    pct_cable_fiber_dsl: Option<f64>,
    pct_served: Option<f64>,
    adoption_gap: Option<f64>,
    pct_bachelors_plus: Option<f64>,
    unemployment_rate: Option<f64>,
    pct_minority: Option<f64>,
    hh_per_bsl: Option<f64>,
    pct_no_computer: Option<f64>,
    score_supply_gap: f64,
    score_demand_signal: f64,
    score_funding_tailwind: f64,
    score_build_feasibility: f64,
    opportunity_score: f64,
    opportunity_rank: u32,
    opportunity_tier: &'a str,
}

impl<'a> TractScoreRow<'a> {
    fn new(tract: &'a ScoredTract) -> Self {
        let record = &tract.record;
        let metrics = &tract.metrics;
        Self {
            geoid: record.geoid.as_str(),
            state: &record.state,
            county_name: &record.county_name,
            county_geoid: record.county.as_str(),
            total_population: record.total_population,
            hh_total: record.hh_total,
            median_hh_income: record.median_hh_income,
            total_bsls: record.total_bsls,
            unserved_bsls: record.unserved_bsls,
            underserved_bsls: record.underserved_bsls,
            served_bsls: record.served_bsls,
            unserved_bsls_copper: record.unserved_bsls_copper,
            underserved_bsls_copper: record.underserved_bsls_copper,
            served_bsls_copper: record.served_bsls_copper,
            unserved_bsls_cable: record.unserved_bsls_cable,
            underserved_bsls_cable: record.underserved_bsls_cable,
            served_bsls_cable: record.served_bsls_cable,
            unserved_bsls_fiber: record.unserved_bsls_fiber,
            underserved_bsls_fiber: record.underserved_bsls_fiber,
            served_bsls_fiber: record.served_bsls_fiber,
            unserved_bsls_ltfw: record.unserved_bsls_ltfw,
            underserved_bsls_ltfw: record.underserved_bsls_ltfw,
            served_bsls_ltfw: record.served_bsls_ltfw,
            unique_providers: record.unique_providers,
            unique_providers_copper: record.unique_providers_copper,
            unique_providers_cable: record.unique_providers_cable,
            unique_providers_fiber: record.unique_providers_fiber,
            unique_providers_ltfw: record.unique_providers_ltfw,
            rucc_code: record.rurality.map(fibersight_core::RuralityCode::get),
            county_pop_2020: record.county_population,
            pct_unserved: metrics.pct_unserved,
            pct_underserved: metrics.pct_underserved,
            pct_unserved_underserved: metrics.pct_unserved_underserved,
            pct_fiber_unserved: metrics.pct_fiber_unserved,
            pct_no_fiber: metrics.pct_no_fiber,
            pct_copper_served: metrics.pct_copper_served,
            has_fiber: u8::from(metrics.has_fiber),
            pct_no_internet: metrics.pct_no_internet,
            pct_cellular_only: metrics.pct_cellular_only,
            pct_broadband: metrics.pct_broadband,
            pct_cable_fiber_dsl: metrics.pct_cable_fiber_dsl,
            pct_served: metrics.pct_served,
            adoption_gap: metrics.adoption_gap,
            pct_bachelors_plus: metrics.pct_bachelors_plus,
            unemployment_rate: metrics.unemployment_rate,
            pct_minority: metrics.pct_minority,
            hh_per_bsl: metrics.hh_per_bsl,
            pct_no_computer: metrics.pct_no_computer,
            score_supply_gap: tract.scores.supply_gap,
            score_demand_signal: tract.scores.demand_signal,
            score_funding_tailwind: tract.scores.funding_tailwind,
            score_build_feasibility: tract.scores.build_feasibility,
            opportunity_score: tract.opportunity_score,
            opportunity_rank: tract.opportunity_rank,
            opportunity_tier: tract.opportunity_tier.label(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CountyScoreRow<'a> {
    #[serde(rename = "StateAbbr")]
    state: &'a str,
    #[serde(rename = "CountyName")]
    county_name: &'a str,
    county_geoid: &'a str,
    rucc_code: Option<u8>,
    tract_count: u32,
    avg_score: f64,
    max_score: f64,
    total_bsls: f64,
    total_unserved: f64,
    avg_income: Option<f64>,
    avg_no_fiber_pct: Option<f64>,
}

impl<'a> CountyScoreRow<'a> {
    fn new(county: &'a CountyRollup) -> Self {
        Self {
            state: &county.state,
            county_name: &county.county_name,
            county_geoid: county.county.as_str(),
            rucc_code: county.rurality.map(fibersight_core::RuralityCode::get),
            tract_count: county.tract_count,
            avg_score: county.mean_score,
            max_score: county.max_score,
            total_bsls: county.total_bsls,
            total_unserved: county.total_unserved,
            avg_income: county.mean_income,
            avg_no_fiber_pct: county.mean_no_fiber_pct,
        }
    }
}

fn create_output(path: &Utf8Path) -> Result<BufWriter<File>, OutputError> {
    ensure_parent_dir(path).map_err(|source| OutputError::CreateParent {
        path: path.to_path_buf(),
        source,
    })?;
    let file = File::create(path.as_std_path()).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// Write the full scored tract table as CSV.
///
/// # Errors
/// Returns [`OutputError`] when the file cannot be created or a row fails
/// to encode.
pub fn write_tract_scores(path: &Utf8Path, tracts: &[ScoredTract]) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_writer(create_output(path)?);
    for tract in tracts {
        writer
            .serialize(TractScoreRow::new(tract))
            .map_err(|source| OutputError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
    }
    writer.flush().map_err(|source| OutputError::Flush {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} tract scores to {path}", tracts.len());
    Ok(())
}

/// Write the county rollup table as CSV.
///
/// # Errors
/// Returns [`OutputError`] when the file cannot be created or a row fails
/// to encode.
pub fn write_county_scores(path: &Utf8Path, counties: &[CountyRollup]) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_writer(create_output(path)?);
    for county in counties {
        writer
            .serialize(CountyScoreRow::new(county))
            .map_err(|source| OutputError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
    }
    writer.flush().map_err(|source| OutputError::Flush {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} county rollups to {path}", counties.len());
    Ok(())
}

/// Write the JSON run report.
///
/// # Errors
/// Returns [`OutputError`] when the file cannot be created or the report
/// fails to serialise.
pub fn write_run_report(path: &Utf8Path, report: &RunReport) -> Result<(), OutputError> {
    let mut writer = create_output(path)?;
    serde_json::to_writer_pretty(&mut writer, report).map_err(|source| OutputError::Serialise {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| OutputError::Flush {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
