//! Error types raised by the scoring pipeline.
#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised while scoring a tract population.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    /// No tracts survived loading and filtering; percentile ranks need a
    /// non-empty population.
    #[error("no tracts to score")]
    NoTracts,
}
