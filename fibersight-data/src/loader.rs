//! Reading and merging the three source tables.
//!
//! The demographic and supply tables are inner-joined on the tract GEOID;
//! tracts present in only one source are dropped by design. The rurality
//! table joins on the derived county identifier as a left join, so tracts
//! in unmapped counties keep a null classification. After the join, tracts
//! with no population, households, or serviceable locations are excluded
//! before any ratio or percentile work can divide by zero.
#![forbid(unsafe_code)]

use std::collections::{HashMap, HashSet};

use camino::Utf8Path;
use fibersight_core::{CountyId, Geoid, RuralityCode, TractRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::LoadError;
use crate::sources::{DemographicRow, RuralityRow, SupplyRow};

/// Census marker for "income not available".
const CENSUS_INCOME_SENTINEL: f64 = -666_666_666.0;

/// Per-stage row counts for the run report and failure diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LoadReport {
    /// Rows read from the demographic table.
    pub demographic_rows: usize,
    /// Rows read from the supply table.
    pub supply_rows: usize,
    /// Counties read from the rurality table.
    pub rurality_counties: usize,
    /// Tracts surviving the demographic-supply inner join.
    pub joined_tracts: usize,
    /// Tracts dropped by the positivity filter.
    pub dropped_tracts: usize,
    /// Tracts handed to the scoring pipeline.
    pub retained_tracts: usize,
}

/// Load, join, and filter the three sources into tract records.
///
/// # Errors
/// Returns [`LoadError`] when a source cannot be read or decoded, when a
/// required table or join stage produces zero rows, or when an identifier
/// fails validation.
pub fn load_tracts(
    demographics: &Utf8Path,
    supply: &Utf8Path,
    rurality: &Utf8Path,
) -> Result<(Vec<TractRecord>, LoadReport), LoadError> {
    let demographic_rows: Vec<DemographicRow> = read_rows(demographics, "demographic")?;
    let supply_rows: Vec<SupplyRow> = read_rows(supply, "supply")?;
    let rurality_rows: Vec<RuralityRow> = read_rows(rurality, "rurality")?;
    merge_sources(demographic_rows, supply_rows, rurality_rows)
}

fn read_rows<T: DeserializeOwned>(path: &Utf8Path, table: &'static str) -> Result<Vec<T>, LoadError> {
    let mut reader =
        csv::Reader::from_path(path.as_std_path()).map_err(|source| LoadError::OpenTable {
            table,
            path: path.to_path_buf(),
            source,
        })?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.map_err(|source| LoadError::DecodeRow {
            table,
            path: path.to_path_buf(),
            source,
        })?);
    }
    log::info!("read {} {table} rows from {path}", rows.len());
    Ok(rows)
}

/// Merge already-loaded source rows into tract records.
///
/// Exposed separately from [`load_tracts`] so callers with in-memory tables
/// (tests, alternative transports) can reuse the join logic.
///
/// # Errors
/// Returns [`LoadError`] for empty required tables, duplicate keys, invalid
/// identifiers, or a join/filter stage that leaves nothing to score.
pub fn merge_sources(
    demographics: Vec<DemographicRow>,
    supply: Vec<SupplyRow>,
    rurality: Vec<RuralityRow>,
) -> Result<(Vec<TractRecord>, LoadReport), LoadError> {
    if demographics.is_empty() {
        return Err(LoadError::EmptyTable {
            table: "demographic",
        });
    }
    if supply.is_empty() {
        return Err(LoadError::EmptyTable { table: "supply" });
    }

    let mut report = LoadReport {
        demographic_rows: demographics.len(),
        supply_rows: supply.len(),
        ..LoadReport::default()
    };

    let supply_by_geoid = index_supply(supply)?;
    let rurality_by_county = index_rurality(rurality, &mut report)?;

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for row in demographics {
        if !seen.insert(row.geoid.clone()) {
            return Err(LoadError::DuplicateGeoid {
                table: "demographic",
                geoid: row.geoid,
            });
        }
        // Inner join: tracts absent from the supply table are dropped.
        let Some(supply_row) = supply_by_geoid.get(&row.geoid) else {
            continue;
        };
        report.joined_tracts += 1;

        let geoid = Geoid::new(&row.geoid).map_err(|source| LoadError::InvalidGeoid {
            table: "demographic",
            source,
        })?;
        let county = geoid.county();
        let (rurality_code, county_population) = rurality_by_county
            .get(&county)
            .copied()
            .map_or((None, None), |(code, population)| {
                (Some(code), population)
            });

        let record = build_record(
            geoid,
            county,
            row,
            supply_row,
            rurality_code,
            county_population,
        );
        if record.total_population > 0.0 && record.hh_total > 0.0 && record.total_bsls > 0.0 {
            records.push(record);
        } else {
            report.dropped_tracts += 1;
        }
    }

    if report.joined_tracts == 0 {
        return Err(LoadError::EmptyJoin);
    }
    if records.is_empty() {
        return Err(LoadError::EmptyAfterFilter);
    }
    report.retained_tracts = records.len();
    log::info!(
        "joined {} tracts, dropped {} by the positivity filter, retained {}",
        report.joined_tracts,
        report.dropped_tracts,
        report.retained_tracts
    );
    Ok((records, report))
}

fn index_supply(supply: Vec<SupplyRow>) -> Result<HashMap<String, SupplyRow>, LoadError> {
    let mut by_geoid = HashMap::with_capacity(supply.len());
    for row in supply {
        let geoid = row.geoid.clone();
        if by_geoid.insert(geoid.clone(), row).is_some() {
            return Err(LoadError::DuplicateGeoid {
                table: "supply",
                geoid,
            });
        }
    }
    Ok(by_geoid)
}

fn index_rurality(
    rurality: Vec<RuralityRow>,
    report: &mut LoadReport,
) -> Result<HashMap<CountyId, (RuralityCode, Option<f64>)>, LoadError> {
    let mut by_county = HashMap::with_capacity(rurality.len());
    for row in rurality {
        let county =
            CountyId::new(&row.fips).map_err(|source| LoadError::InvalidCounty { source })?;
        let code = RuralityCode::new(row.code).map_err(|source| {
            LoadError::InvalidRuralityCode {
                county: row.fips.clone(),
                source,
            }
        })?;
        if by_county
            .insert(county.clone(), (code, row.county_population))
            .is_some()
        {
            log::warn!("county {county} appears twice in the rurality table; keeping the last row");
        }
    }
    report.rurality_counties = by_county.len();
    Ok(by_county)
}

fn clean_income(income: Option<f64>) -> Option<f64> {
    income.filter(|value| (value - CENSUS_INCOME_SENTINEL).abs() > 0.5)
}

fn build_record(
    geoid: Geoid,
    county: CountyId,
    row: DemographicRow,
    supply: &SupplyRow,
    rurality: Option<RuralityCode>,
    county_population: Option<f64>,
) -> TractRecord {
    TractRecord {
        geoid,
        county,
        state: supply.state.clone(),
        county_name: supply.county_name.clone(),
        total_population: row.total_population,
        hh_total: row.hh_total,
        hh_broadband_any: row.hh_broadband_any,
        hh_cellular_only: row.hh_cellular_only,
        hh_cable_fiber_dsl: row.hh_cable_fiber_dsl,
        hh_no_internet: row.hh_no_internet,
        median_hh_income: clean_income(row.median_hh_income),
        edu_total_25plus: row.edu_total_25plus,
        edu_bachelors: row.edu_bachelors,
        edu_masters: row.edu_masters,
        edu_professional: row.edu_professional,
        edu_doctorate: row.edu_doctorate,
        emp_civilian_labor: row.emp_civilian_labor,
        emp_unemployed: row.emp_unemployed,
        race_total: row.race_total,
        race_nh_white: row.race_nh_white,
        comp_total_hh: row.comp_total_hh,
        comp_no_computer: row.comp_no_computer,
        total_bsls: supply.total_bsls,
        unserved_bsls: supply.unserved_bsls,
        underserved_bsls: supply.underserved_bsls,
        served_bsls: supply.served_bsls,
        unserved_bsls_copper: supply.unserved_bsls_copper,
        underserved_bsls_copper: supply.underserved_bsls_copper,
        served_bsls_copper: supply.served_bsls_copper,
        unserved_bsls_cable: supply.unserved_bsls_cable,
        underserved_bsls_cable: supply.underserved_bsls_cable,
        served_bsls_cable: supply.served_bsls_cable,
        unserved_bsls_fiber: supply.unserved_bsls_fiber,
        underserved_bsls_fiber: supply.underserved_bsls_fiber,
        served_bsls_fiber: supply.served_bsls_fiber,
        unserved_bsls_ltfw: supply.unserved_bsls_ltfw,
        underserved_bsls_ltfw: supply.underserved_bsls_ltfw,
        served_bsls_ltfw: supply.served_bsls_ltfw,
        unique_providers: supply.unique_providers,
        unique_providers_copper: supply.unique_providers_copper,
        unique_providers_cable: supply.unique_providers_cable,
        unique_providers_fiber: supply.unique_providers_fiber,
        unique_providers_ltfw: supply.unique_providers_ltfw,
        rurality,
        county_population,
    }
}
