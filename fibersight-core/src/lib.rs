//! Core domain types for the Fibersight scoring engine.
//!
//! The crate models a single unit of analysis, the Census tract, together
//! with the derived metrics and scores attached to it as the pipeline runs.
//! Constructors validate identifiers up front so downstream stages can rely
//! on well-formed keys, and every potentially absent numeric value is an
//! explicit [`Option`] rather than a sentinel. The shared
//! [`percentile_scores`] primitive implements the rank-based normalisation
//! used by every scoring engine.

#![forbid(unsafe_code)]

mod geoid;
mod percentile;
mod score;
mod tract;

pub use geoid::{CountyId, Geoid, GeoidError};
pub use percentile::{Direction, percentile_fractions, percentile_scores};
pub use score::{CountyRollup, ScoredTract, SubScores, Tier};
pub use tract::{DerivedMetrics, RuralityCode, RuralityCodeError, TractRecord};

#[cfg(test)]
mod tests;
