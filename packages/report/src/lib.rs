#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only views over the adjusted probability artifact.
//!
//! Lists localities, bounds the selectable date range for a locality, and
//! counts the weeks whose enemy-action and explosive-hazard estimates reach
//! a decision threshold.

pub mod summary;

use std::path::Path;

use exposure_database::ArtifactError;
use exposure_database::artifact::read_artifact;
use exposure_pipeline_models::AdjustedRow;

pub use summary::{
    DEFAULT_THRESHOLD, LocalitySummary, ReportQuery, SeriesPoint, localities, summarize,
    week_start_range,
};

/// Errors that can occur while building a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The artifact is missing or holds no rows.
    #[error("No data available")]
    NoData,

    /// The requested locality does not appear in the artifact.
    #[error("Unknown locality '{locality}'")]
    UnknownLocality {
        /// The requested locality.
        locality: String,
    },

    /// The requested date range is empty or the threshold is not a number.
    #[error("Invalid query: {message}")]
    InvalidQuery {
        /// Description of what went wrong.
        message: String,
    },

    /// The artifact exists but could not be read.
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Loads the artifact rows for reporting.
///
/// # Errors
///
/// Returns [`ReportError::NoData`] if the file does not exist or is empty,
/// or [`ReportError::Artifact`] if it cannot be read.
pub fn load(path: &Path) -> Result<Vec<AdjustedRow>, ReportError> {
    let rows = match read_artifact(path) {
        Ok(rows) => rows,
        Err(ArtifactError::Missing { .. }) => {
            log::warn!("No artifact at {}", path.display());
            return Err(ReportError::NoData);
        }
        Err(e) => return Err(e.into()),
    };

    if rows.is_empty() {
        log::warn!("Artifact {} holds no rows", path.display());
        return Err(ReportError::NoData);
    }

    Ok(rows)
}
