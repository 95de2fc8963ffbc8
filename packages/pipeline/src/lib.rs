#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weekly incident probability pipeline.
//!
//! Turns a sparse, irregular event log into a dense `locality x week`
//! surface of per-type probabilities:
//!
//! 1. [`normalize`]: parse records, count per `(date, locality, type)`
//! 2. [`weekly`]: tag each day with its week and binarize
//! 3. [`probability`]: attacked days / 7 per week
//! 4. [`pivot`]: one column per incident type
//! 5. [`densify`]: every locality x every week, zero-filled
//! 6. [`smooth`]: trailing rolling mean per locality
//! 7. [`adjust`]: raw value where nonzero, else the rolling mean
//!
//! Every stage is a pure function from one immutable table to a new one.
//! [`run`] chains them and is the only entry point callers need.

pub mod adjust;
pub mod densify;
pub mod normalize;
pub mod pivot;
pub mod probability;
pub mod smooth;
pub mod weekly;

use std::sync::Arc;

use exposure_pipeline_models::{AdjustedRow, ObservedDomain, WeekKey};
use exposure_source::SourceError;
use exposure_source::extract_def::ExtractDefinition;
use exposure_source::progress::ProgressCallback;
use exposure_source::reader::RawRecord;
use serde::{Deserialize, Serialize};

/// Default trailing window: the current week plus three preceding weeks.
pub const DEFAULT_ROLLING_WINDOW: usize = 4;

/// Errors that abort a pipeline run. None of them are retryable.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A record has an unparseable timestamp or an empty required field.
    #[error("Input format error at line {line}: {message}")]
    InputFormat {
        /// 1-based line in the extract.
        line: u64,
        /// Description of what went wrong.
        message: String,
    },

    /// The extract could not be read (missing columns, I/O, CSV).
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// The extract has no data rows, so there is no date range.
    #[error("Extract contains no records")]
    EmptyInput,

    /// A pivoted row is keyed outside the generated calendar domain, which
    /// means bucketing and calendar generation disagree.
    #[error("Week {week} for locality '{locality}' is outside the generated calendar")]
    ScheduleInconsistency {
        /// Locality of the offending row.
        locality: String,
        /// Week of the offending row.
        week: WeekKey,
    },

    /// The pivoted table holds two rows for the same key.
    #[error("Duplicate pivoted row for locality '{locality}', week {week}")]
    DuplicateRow {
        /// Locality of the duplicate.
        locality: String,
        /// Week of the duplicate.
        week: WeekKey,
    },

    /// A type label matched no tracked type under the `reject` policy.
    #[error("Unknown incident type '{label}' at line {line}")]
    UnknownIncidentType {
        /// 1-based line in the extract.
        line: u64,
        /// The unmatched label.
        label: String,
    },

    /// Pipeline options are out of range.
    #[error("Invalid pipeline options: {message}")]
    Options {
        /// Description of what went wrong.
        message: String,
    },
}

/// How the host-nation-activity rolling average is partitioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostNationPartition {
    /// Same trailing window per locality as the other three columns.
    #[default]
    Locality,
    /// Partition by locality and week, which collapses the window to the
    /// current week, so host-nation values are never smoothed.
    LocalityWeek,
}

/// Tunable parameters for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOptions {
    /// Trailing window length in weeks, including the current week.
    pub rolling_window: usize,
    /// Partitioning of the host-nation-activity rolling average.
    pub host_nation_partition: HostNationPartition,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            rolling_window: DEFAULT_ROLLING_WINDOW,
            host_nation_partition: HostNationPartition::default(),
        }
    }
}

impl PipelineOptions {
    /// Checks that the options describe a computable run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Options`] if the rolling window is zero.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.rolling_window == 0 {
            return Err(PipelineError::Options {
                message: "rolling window must be at least 1 week".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Localities and date range the calendar was built from.
    pub domain: ObservedDomain,
    /// Final table, ordered by locality then week.
    pub rows: Vec<AdjustedRow>,
}

/// Labels reported to the progress callback, one per stage.
const STAGES: &[&str] = &[
    "Normalizing events",
    "Aggregating weeks",
    "Estimating probabilities",
    "Pivoting types",
    "Densifying calendar",
    "Smoothing",
    "Adjusting",
];

/// Runs all seven stages over the raw records of one extract.
///
/// # Errors
///
/// Returns [`PipelineError`] if the options are invalid, the extract is
/// empty, any record fails validation, or the densified calendar does not
/// cover the observed weeks.
pub fn run(
    records: &[RawRecord],
    def: &ExtractDefinition,
    options: &PipelineOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PipelineOutput, PipelineError> {
    options.validate()?;

    progress.set_total(STAGES.len() as u64);
    let mut stages = STAGES.iter();
    let mut step = || {
        if let Some(label) = stages.next() {
            progress.set_message((*label).to_string());
        }
    };

    step();
    let normalized = normalize::normalize(records, def)?;
    let daily = normalize::count_daily(&normalized.events);
    progress.inc(1);

    step();
    let indicators = weekly::weekly_indicators(&daily);
    progress.inc(1);

    step();
    let probabilities = probability::weekly_probabilities(&indicators);
    progress.inc(1);

    step();
    let wide = pivot::pivot(&probabilities);
    progress.inc(1);

    step();
    let dense = densify::densify(&wide, &normalized.domain)?;
    progress.inc(1);

    step();
    let smoothed = smooth::smooth(&dense, options);
    progress.inc(1);

    step();
    let rows = adjust::adjust(&smoothed);
    progress.inc(1);

    progress.finish(format!(
        "{} rows across {} localities",
        rows.len(),
        normalized.domain.localities.len()
    ));

    Ok(PipelineOutput {
        domain: normalized.domain,
        rows,
    })
}
