//! Facade crate for the Fibersight opportunity scoring engine.
//!
//! This crate re-exports the domain types, the dataset loader, and the
//! scoring pipeline so downstream tooling can depend on a single crate.

#![forbid(unsafe_code)]

pub use fibersight_core::{
    CountyId, CountyRollup, DerivedMetrics, Direction, Geoid, GeoidError, RuralityCode,
    RuralityCodeError, ScoredTract, SubScores, Tier, TractRecord, percentile_fractions,
    percentile_scores,
};

pub use fibersight_data::{
    LoadError, LoadReport, OutputError, RunReport, load_tracts, merge_sources,
    write_county_scores, write_run_report, write_tract_scores,
};

pub use fibersight_scorer::{ScoreError, ScoreOutcome, score_tracts};
