//! Dataset ingestion and output persistence for the Fibersight pipeline.
//!
//! The loader reads the three tabular sources (Census demographics, FCC
//! broadband availability, USDA rurality classification) from CSV, joins
//! them into one [`TractRecord`](fibersight_core::TractRecord) per tract,
//! and applies the sentinel and positivity rules. The output module
//! persists the scored table, the county rollup, and a JSON run report.
//!
//! Persistence only begins after scoring has completed in memory, so a
//! failed run never leaves a partial score table behind.

#![forbid(unsafe_code)]

mod error;
pub mod fs;
mod loader;
mod output;
mod sources;

pub use error::{LoadError, OutputError};
pub use loader::{LoadReport, load_tracts, merge_sources};
pub use output::{RunReport, write_county_scores, write_run_report, write_tract_scores};
pub use sources::{DemographicRow, RuralityRow, SupplyRow};
