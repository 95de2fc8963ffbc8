//! Pivoter.
//!
//! Reshapes long `(week, locality, type, probability)` rows into one
//! [`WideRow`] per `(week, locality)`. Types with no row are zero, never
//! absent, so nothing downstream has to handle missing values.

use std::collections::BTreeMap;

use exposure_incident_models::TypeValues;
use exposure_pipeline_models::{WeekKey, WeeklyProbability, WideRow};

/// Pivots long probabilities into wide rows ordered by locality, then week.
///
/// Values for the same `(week, locality, type)` are summed; the estimator
/// emits each triple once, so in practice this is a plain placement.
#[must_use]
pub fn pivot(probabilities: &[WeeklyProbability]) -> Vec<WideRow> {
    let mut wide: BTreeMap<(&str, WeekKey), TypeValues> = BTreeMap::new();
    for row in probabilities {
        let values = wide.entry((row.locality.as_str(), row.week)).or_default();
        let current = values.get(row.incident_type);
        *values = values.with(row.incident_type, current + row.probability);
    }

    let rows: Vec<WideRow> = wide
        .into_iter()
        .map(|((locality, week), values)| WideRow {
            week,
            locality: locality.to_string(),
            values,
        })
        .collect();

    log::info!("Pivoted into {} observed (locality, week) rows", rows.len());
    rows
}
