//! Command-line interface for the Fibersight scoring pipeline.
//!
//! The `score` subcommand runs the whole pipeline in one shot: load the
//! three CSV sources, score every tract, and write the scored table, the
//! county rollup, and a JSON run report into the output directory. Source
//! and output paths can come from CLI flags, configuration files, or
//! environment variables.
#![forbid(unsafe_code)]

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use fibersight_data::{LoadError, OutputError, RunReport};
use fibersight_scorer::ScoreError;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ARG_DEMOGRAPHICS: &str = "demographics";
const ARG_SUPPLY: &str = "supply";
const ARG_RURALITY: &str = "rurality";
const ARG_OUT_DIR: &str = "out-dir";
const ENV_DEMOGRAPHICS: &str = "FIBERSIGHT_CMDS_SCORE_DEMOGRAPHICS";
const ENV_SUPPLY: &str = "FIBERSIGHT_CMDS_SCORE_SUPPLY";
const ENV_RURALITY: &str = "FIBERSIGHT_CMDS_SCORE_RURALITY";
const ENV_OUT_DIR: &str = "FIBERSIGHT_CMDS_SCORE_OUT_DIR";

/// Scored tract table file name within the output directory.
const TRACT_SCORES_FILE: &str = "tract_scores.csv";
/// County rollup file name within the output directory.
const COUNTY_SCORES_FILE: &str = "county_scores.csv";
/// Run report file name within the output directory.
const RUN_REPORT_FILE: &str = "run_report.json";

/// Run the Fibersight CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration layering,
/// source validation, or any pipeline stage fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => {
            let config = args.into_config()?;
            config.validate_sources()?;
            execute(&config)
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "fibersight",
    about = "Tract-level fiber build opportunity scoring",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score every tract from the three source tables.
    Score(ScoreArgs),
}

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Define the source tables and output directory for a \
                 scoring run. Paths can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Score every tract from the demographic, supply, and rurality tables"
)]
#[ortho_config(prefix = "FIBERSIGHT")]
struct ScoreArgs {
    /// Path to the Census ACS demographic CSV.
    #[arg(long = ARG_DEMOGRAPHICS, value_name = "path")]
    #[serde(default)]
    demographics: Option<Utf8PathBuf>,
    /// Path to the FCC broadband availability CSV.
    #[arg(long = ARG_SUPPLY, value_name = "path")]
    #[serde(default)]
    supply: Option<Utf8PathBuf>,
    /// Path to the USDA rural-urban continuum CSV.
    #[arg(long = ARG_RURALITY, value_name = "path")]
    #[serde(default)]
    rurality: Option<Utf8PathBuf>,
    /// Directory receiving the scored tables and the run report.
    #[arg(long = ARG_OUT_DIR, value_name = "dir")]
    #[serde(default)]
    out_dir: Option<Utf8PathBuf>,
}

impl ScoreArgs {
    fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScoreConfig {
    demographics: Utf8PathBuf,
    supply: Utf8PathBuf,
    rurality: Utf8PathBuf,
    out_dir: Utf8PathBuf,
}

impl ScoreConfig {
    fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.demographics, ARG_DEMOGRAPHICS)?;
        Self::require_existing(&self.supply, ARG_SUPPLY)?;
        Self::require_existing(&self.rurality, ARG_RURALITY)?;
        if fibersight_data::fs::file_is_file(&self.out_dir) {
            return Err(CliError::OutputDirIsFile {
                path: self.out_dir.clone(),
            });
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        if fibersight_data::fs::file_is_file(path) {
            Ok(())
        } else {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let demographics = args.demographics.ok_or(CliError::MissingArgument {
            field: ARG_DEMOGRAPHICS,
            env: ENV_DEMOGRAPHICS,
        })?;
        let supply = args.supply.ok_or(CliError::MissingArgument {
            field: ARG_SUPPLY,
            env: ENV_SUPPLY,
        })?;
        let rurality = args.rurality.ok_or(CliError::MissingArgument {
            field: ARG_RURALITY,
            env: ENV_RURALITY,
        })?;
        let out_dir = args.out_dir.ok_or(CliError::MissingArgument {
            field: ARG_OUT_DIR,
            env: ENV_OUT_DIR,
        })?;
        Ok(Self {
            demographics,
            supply,
            rurality,
            out_dir,
        })
    }
}

fn execute(config: &ScoreConfig) -> Result<(), CliError> {
    let (records, load_report) =
        fibersight_data::load_tracts(&config.demographics, &config.supply, &config.rurality)?;
    let outcome = fibersight_scorer::score_tracts(records)?;

    fibersight_data::write_tract_scores(
        &config.out_dir.join(TRACT_SCORES_FILE),
        &outcome.tracts,
    )?;
    fibersight_data::write_county_scores(
        &config.out_dir.join(COUNTY_SCORES_FILE),
        &outcome.counties,
    )?;
    let report = RunReport::new(load_report, &outcome.tracts, &outcome.counties);
    fibersight_data::write_run_report(&config.out_dir.join(RUN_REPORT_FILE), &report)?;

    log_summary(&report, &outcome);
    Ok(())
}

/// Number of top-ranked tracts echoed into the run log.
const TOP_TRACTS_LOGGED: usize = 5;

fn log_summary(report: &RunReport, outcome: &fibersight_scorer::ScoreOutcome) {
    let tiers: Vec<String> = report
        .tier_counts
        .iter()
        .map(|(tier, count)| format!("{tier}: {count}"))
        .collect();
    log::info!(
        "scored {} tracts in {} counties ({})",
        report.scored_tracts,
        report.counties,
        tiers.join(", ")
    );
    for tract in outcome.tracts.iter().take(TOP_TRACTS_LOGGED) {
        log::info!(
            "#{} {} {} ({}): {:.2} [{}]",
            tract.opportunity_rank,
            tract.record.geoid,
            tract.record.county_name,
            tract.record.state,
            tract.opportunity_score,
            tract.opportunity_tier
        );
    }
}

/// Errors emitted by the Fibersight CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing CLI flag.
        field: &'static str,
        /// Environment variable that can supply the value instead.
        env: &'static str,
    },
    /// A referenced source path does not name an existing file.
    #[error("{field} path {path} does not exist")]
    MissingSourceFile {
        /// Name of the offending CLI flag.
        field: &'static str,
        /// Requested path.
        path: Utf8PathBuf,
    },
    /// The output directory path names an existing file.
    #[error("output directory {path} is a file")]
    OutputDirIsFile {
        /// Requested path.
        path: Utf8PathBuf,
    },
    /// Loading or merging the source tables failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Scoring the tract population failed.
    #[error(transparent)]
    Score(#[from] ScoreError),
    /// Persisting the scored outputs failed.
    #[error(transparent)]
    Output(#[from] OutputError),
}
