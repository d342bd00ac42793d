//! Error types raised while loading sources and persisting outputs.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use fibersight_core::{GeoidError, RuralityCodeError};
use thiserror::Error;

/// Errors raised while reading and merging the three source tables.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Opening or reading a source CSV failed.
    #[error("failed to open {table} table at {path}")]
    OpenTable {
        /// Logical table name.
        table: &'static str,
        /// Requested file path.
        path: Utf8PathBuf,
        /// Source error from the CSV reader.
        #[source]
        source: csv::Error,
    },
    /// Decoding a CSV row into its typed form failed.
    #[error("failed to decode a {table} row from {path}")]
    DecodeRow {
        /// Logical table name.
        table: &'static str,
        /// Requested file path.
        path: Utf8PathBuf,
        /// Source error from the CSV reader.
        #[source]
        source: csv::Error,
    },
    /// A required source table contained no rows.
    #[error("{table} table is empty")]
    EmptyTable {
        /// Logical table name.
        table: &'static str,
    },
    /// A tract identifier failed validation.
    #[error("invalid tract identifier in {table} table")]
    InvalidGeoid {
        /// Logical table name.
        table: &'static str,
        /// Source validation error.
        #[source]
        source: GeoidError,
    },
    /// A county FIPS code failed validation.
    #[error("invalid county identifier in rurality table")]
    InvalidCounty {
        /// Source validation error.
        #[source]
        source: GeoidError,
    },
    /// A rurality code fell outside the 1-9 scale.
    #[error("invalid rurality code for county {county}")]
    InvalidRuralityCode {
        /// County FIPS code of the offending row.
        county: String,
        /// Source validation error.
        #[source]
        source: RuralityCodeError,
    },
    /// A source table keyed the same tract twice.
    #[error("duplicate tract {geoid} in {table} table")]
    DuplicateGeoid {
        /// Logical table name.
        table: &'static str,
        /// Duplicated identifier.
        geoid: String,
    },
    /// The demographic and supply tables share no tracts.
    #[error("demographic and supply tables share no tracts")]
    EmptyJoin,
    /// The positivity filter removed every joined tract.
    #[error("no tracts remain after the population/household/BSL filter")]
    EmptyAfterFilter,
}

/// Errors raised while persisting scored outputs.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Creating the parent directory for an output file failed.
    #[error("failed to create parent directory for {path}")]
    CreateParent {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Creating an output file failed.
    #[error("failed to create output file at {path}")]
    Create {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Encoding a CSV row failed.
    #[error("failed to write CSV row to {path}")]
    Encode {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from the CSV writer.
        #[source]
        source: csv::Error,
    },
    /// Serialising the run report to JSON failed.
    #[error("failed to serialise run report to {path}")]
    Serialise {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Flushing an output file failed.
    #[error("failed to flush output file at {path}")]
    Flush {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
}
