//! Actions shared by the subcommands and the interactive menu.

use std::path::{Path, PathBuf};
use std::time::Instant;

use exposure_cli_utils::{IndicatifProgress, MultiProgress};
use exposure_database::artifact::write_artifact;
use exposure_pipeline::PipelineOptions;
use exposure_pipeline_models::AdjustedRow;
use exposure_report::{LocalitySummary, ReportError, ReportQuery};
use exposure_source::extract_def::{ExtractDefinition, load_extract_toml};
use exposure_source::reader::read_extract;
use exposure_source::registry::default_extract;

/// Message printed when there is no artifact to read.
const NO_DATA: &str = "No data available";

/// Inputs of a pipeline run.
pub struct RunArgs {
    /// Raw extract CSV.
    pub input: PathBuf,
    /// Artifact destination.
    pub output: PathBuf,
    /// Optional extract definition file.
    pub extract: Option<PathBuf>,
    /// Smoothing options.
    pub options: PipelineOptions,
}

/// Reads the extract, runs every stage and writes the artifact.
///
/// The artifact is only touched after all stages succeed.
///
/// # Errors
///
/// Returns an error if the extract or its definition cannot be read, any
/// stage fails, or the artifact cannot be written.
pub fn run_pipeline(
    multi: &MultiProgress,
    args: &RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let def: ExtractDefinition = match &args.extract {
        Some(path) => load_extract_toml(path)?,
        None => default_extract(),
    };
    log::info!("Using extract definition '{}' ({})", def.id, def.name);

    let reading = IndicatifProgress::spinner(multi, &format!("Reading {}", args.input.display()));
    let records = read_extract(&args.input, &def)?;
    reading.finish(format!("Read {} records", records.len()));

    let stages = IndicatifProgress::stages_bar(multi, "Computing probabilities");
    let output = exposure_pipeline::run(&records, &def, &args.options, &stages)?;

    let writing = IndicatifProgress::spinner(multi, &format!("Writing {}", args.output.display()));
    write_artifact(&args.output, &output.rows)?;
    writing.finish(format!("Wrote {}", args.output.display()));

    println!(
        "{} rows ({} localities, {} to {}) written to {} in {:.1}s",
        output.rows.len(),
        output.domain.localities.len(),
        output.domain.first,
        output.domain.last,
        args.output.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Prints the artifact's localities, one per line.
///
/// # Errors
///
/// Returns an error if the artifact exists but cannot be read.
pub fn list_localities(artifact: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let Some(rows) = load_or_report_missing(artifact)? else {
        return Ok(());
    };
    for locality in exposure_report::localities(&rows) {
        println!("{locality}");
    }
    Ok(())
}

/// Prints the threshold summary for one locality.
///
/// # Errors
///
/// Returns an error if the artifact cannot be read, the locality is
/// unknown, or the query is invalid.
pub fn report(
    artifact: &Path,
    query: &ReportQuery,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(rows) = load_or_report_missing(artifact)? else {
        return Ok(());
    };
    print_report(&rows, query, json)
}

/// Summarizes already loaded rows and prints the result.
///
/// # Errors
///
/// Returns an error if the locality is unknown, the query is invalid, or
/// JSON serialization fails.
pub fn print_report(
    rows: &[AdjustedRow],
    query: &ReportQuery,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = exposure_report::summarize(rows, query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Loads the artifact, printing [`NO_DATA`] and returning `None` if it is
/// missing or empty.
///
/// # Errors
///
/// Returns [`ReportError`] if the artifact exists but cannot be read.
pub fn load_or_report_missing(
    artifact: &Path,
) -> Result<Option<Vec<AdjustedRow>>, ReportError> {
    match exposure_report::load(artifact) {
        Ok(rows) => Ok(Some(rows)),
        Err(ReportError::NoData) => {
            println!("{NO_DATA}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn print_summary(summary: &LocalitySummary) {
    println!(
        "{}: weeks starting {} through {}",
        summary.locality, summary.from, summary.to
    );
    println!(
        "Weeks at or above {:.2}: enemy action {}, explosive hazard {} (of {})",
        summary.threshold,
        summary.enemy_action_weeks,
        summary.explosive_hazard_weeks,
        summary.series.len()
    );
    println!();
    println!("{:<8} {:<10}  {:>12} {:>16}", "WEEK", "START", "ENEMY ACTION", "EXPLOSIVE HAZARD");
    println!("{}", "-".repeat(50));
    for point in &summary.series {
        println!(
            "{:<8} {:<10}  {:>12.4} {:>16.4}",
            point.year_week.to_string(),
            point.week_start.to_string(),
            point.enemy_action,
            point.explosive_hazard
        );
    }
}
