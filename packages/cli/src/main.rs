#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the weekly combat exposure pipeline.
//!
//! `run` turns a raw SIGACT extract into the Parquet probability artifact;
//! `localities` and `report` read that artifact back. Without a subcommand
//! an interactive menu walks through the same actions.
//!
//! Uses `indicatif-log-bridge` (via [`exposure_cli_utils::init_logger`]) so
//! `RUST_LOG` output and progress bars share the terminal cleanly.

mod commands;
mod interactive;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use exposure_pipeline::{DEFAULT_ROLLING_WINDOW, HostNationPartition};
use exposure_report::DEFAULT_THRESHOLD;

#[derive(Parser)]
#[command(name = "exposure", about = "Weekly combat exposure probabilities")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the probability artifact from a raw extract
    Run {
        /// Raw extract CSV (default: `data/IQ_SIGACTs.csv`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Artifact to write (default: `data/probabilities.parquet`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Extract definition TOML overriding the built-in SIGACT layout
        #[arg(long)]
        extract: Option<PathBuf>,
        /// Trailing rolling window in weeks, including the current week
        #[arg(long, default_value_t = DEFAULT_ROLLING_WINDOW)]
        window: usize,
        /// Partitioning of the host-nation-activity rolling average
        #[arg(long, value_enum, default_value_t = PartitionArg::Locality)]
        host_nation_partition: PartitionArg,
    },
    /// List the localities present in the artifact
    Localities {
        /// Artifact to read (default: `data/probabilities.parquet`)
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Count weeks at or above a threshold for one locality
    Report {
        /// Locality to report on
        #[arg(long)]
        locality: String,
        /// First week-start date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last week-start date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Probability threshold
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,
        /// Artifact to read (default: `data/probabilities.parquet`)
        #[arg(long)]
        artifact: Option<PathBuf>,
        /// Print the summary and weekly series as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Command-line spelling of [`HostNationPartition`].
#[derive(Clone, Copy, ValueEnum)]
enum PartitionArg {
    /// Same trailing window as the other incident types
    Locality,
    /// Per-week partition; disables smoothing for this column
    LocalityWeek,
}

impl From<PartitionArg> for HostNationPartition {
    fn from(arg: PartitionArg) -> Self {
        match arg {
            PartitionArg::Locality => Self::Locality,
            PartitionArg::LocalityWeek => Self::LocalityWeek,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = exposure_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi);
    };

    match command {
        Commands::Run {
            input,
            output,
            extract,
            window,
            host_nation_partition,
        } => {
            let args = commands::RunArgs {
                input: input.unwrap_or_else(exposure_database::paths::default_input_path),
                output: output.unwrap_or_else(exposure_database::paths::default_artifact_path),
                extract,
                options: exposure_pipeline::PipelineOptions {
                    rolling_window: window,
                    host_nation_partition: host_nation_partition.into(),
                },
            };
            commands::run_pipeline(&multi, &args)?;
        }
        Commands::Localities { artifact } => {
            let artifact =
                artifact.unwrap_or_else(exposure_database::paths::default_artifact_path);
            commands::list_localities(&artifact)?;
        }
        Commands::Report {
            locality,
            from,
            to,
            threshold,
            artifact,
            json,
        } => {
            let artifact =
                artifact.unwrap_or_else(exposure_database::paths::default_artifact_path);
            let query = exposure_report::ReportQuery {
                locality,
                from,
                to,
                threshold,
            };
            commands::report(&artifact, &query, json)?;
        }
    }

    Ok(())
}
