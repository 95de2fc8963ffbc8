//! Calendar densifier.
//!
//! Builds the canonical key space (every observed locality x every week from
//! the first observed week through the last) and places the sparse pivoted
//! rows into it. Keys without an observation get all-zero values, so a
//! locality that was only active for part of the period still has a row for
//! every week.

use std::collections::{BTreeMap, BTreeSet};

use exposure_incident_models::TypeValues;
use exposure_pipeline_models::{DenseRow, ObservedDomain, WeekKey, WideRow};

use crate::PipelineError;

/// Left-joins `rows` onto the full `locality x week` grid of `domain`.
///
/// Output is ordered by locality, then week, with exactly one row per key.
/// Rolling columns are zero; the smoother fills them.
///
/// # Errors
///
/// * [`PipelineError::ScheduleInconsistency`] if a row's locality or week
///   is not part of the generated grid.
/// * [`PipelineError::DuplicateRow`] if two rows share a key.
pub fn densify(rows: &[WideRow], domain: &ObservedDomain) -> Result<Vec<DenseRow>, PipelineError> {
    let weeks = domain.weeks();
    let week_set: BTreeSet<WeekKey> = weeks.iter().copied().collect();

    let mut observed: BTreeMap<(&str, WeekKey), TypeValues> = BTreeMap::new();
    for row in rows {
        if !domain.localities.contains(&row.locality) || !week_set.contains(&row.week) {
            return Err(PipelineError::ScheduleInconsistency {
                locality: row.locality.clone(),
                week: row.week,
            });
        }
        if observed
            .insert((row.locality.as_str(), row.week), row.values)
            .is_some()
        {
            return Err(PipelineError::DuplicateRow {
                locality: row.locality.clone(),
                week: row.week,
            });
        }
    }

    let mut dense = Vec::with_capacity(domain.localities.len() * weeks.len());
    for locality in &domain.localities {
        for &week in &weeks {
            let raw = observed
                .get(&(locality.as_str(), week))
                .copied()
                .unwrap_or_default();
            dense.push(DenseRow {
                week,
                locality: locality.clone(),
                raw,
                rolling: TypeValues::ZERO,
            });
        }
    }

    log::info!(
        "Densified {} observed rows into {} rows ({} localities x {} weeks)",
        rows.len(),
        dense.len(),
        domain.localities.len(),
        weeks.len()
    );

    Ok(dense)
}
