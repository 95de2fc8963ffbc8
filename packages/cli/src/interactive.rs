//! Menu-driven front end for the exposure tool.
//!
//! Offers the same actions as the subcommands, prompting with `dialoguer`
//! for paths, options and the locality to report on.

use std::path::PathBuf;

use chrono::NaiveDate;
use dialoguer::{Confirm, Input, Select};
use exposure_cli_utils::MultiProgress;
use exposure_database::paths::{default_artifact_path, default_input_path};
use exposure_pipeline::{DEFAULT_ROLLING_WINDOW, HostNationPartition, PipelineOptions};
use exposure_report::{DEFAULT_THRESHOLD, ReportQuery};

use crate::commands::{self, RunArgs};

/// Top-level actions in the interactive menu.
enum Action {
    RunPipeline,
    ListLocalities,
    LocalityReport,
}

impl Action {
    const ALL: &[Self] = &[Self::RunPipeline, Self::ListLocalities, Self::LocalityReport];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RunPipeline => "Compute probabilities from an extract",
            Self::ListLocalities => "List localities",
            Self::LocalityReport => "Locality threshold report",
        }
    }
}

/// Prompts for an action and runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected action fails.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Combat Exposure Pipeline");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::RunPipeline => run_pipeline(multi)?,
        Action::ListLocalities => commands::list_localities(&default_artifact_path())?,
        Action::LocalityReport => locality_report()?,
    }

    Ok(())
}

fn run_pipeline(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt_path("Extract CSV", default_input_path())?;
    let output = prompt_path("Artifact path", default_artifact_path())?;

    let mut options = PipelineOptions::default();
    let advanced = Confirm::new()
        .with_prompt("Configure smoothing options?")
        .default(false)
        .interact()?;
    if advanced {
        options.rolling_window = Input::new()
            .with_prompt("Rolling window (weeks)")
            .default(DEFAULT_ROLLING_WINDOW)
            .validate_with(|n: &usize| {
                if *n >= 1 {
                    Ok(())
                } else {
                    Err("window must be at least 1 week")
                }
            })
            .interact_text()?;

        let partitions = ["Per locality", "Per locality and week"];
        let choice = Select::new()
            .with_prompt("Host-nation activity smoothing")
            .items(&partitions)
            .default(0)
            .interact()?;
        options.host_nation_partition = if choice == 0 {
            HostNationPartition::Locality
        } else {
            HostNationPartition::LocalityWeek
        };
    }

    commands::run_pipeline(
        multi,
        &RunArgs {
            input,
            output,
            extract: None,
            options,
        },
    )
}

fn locality_report() -> Result<(), Box<dyn std::error::Error>> {
    let artifact = prompt_path("Artifact path", default_artifact_path())?;
    let Some(rows) = commands::load_or_report_missing(&artifact)? else {
        return Ok(());
    };

    let localities = exposure_report::localities(&rows);
    let idx = Select::new()
        .with_prompt("Locality")
        .items(&localities)
        .default(0)
        .max_length(20)
        .interact()?;
    let locality = localities[idx].clone();

    let Some((min, max)) = exposure_report::week_start_range(&rows, &locality) else {
        println!("No weeks for {locality}");
        return Ok(());
    };

    let from = prompt_date("From (week start)", min)?;
    let to = prompt_date("To (week start)", max)?;
    let threshold: f64 = Input::new()
        .with_prompt("Threshold")
        .default(DEFAULT_THRESHOLD)
        .interact_text()?;

    commands::print_report(
        &rows,
        &ReportQuery {
            locality,
            from: Some(from),
            to: Some(to),
            threshold,
        },
        false,
    )
}

fn prompt_path(prompt: &str, default: PathBuf) -> Result<PathBuf, dialoguer::Error> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .default(default.display().to_string())
        .interact_text()?;
    Ok(PathBuf::from(text))
}

fn prompt_date(prompt: &str, default: NaiveDate) -> Result<NaiveDate, dialoguer::Error> {
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
}
