//! Probability estimator.
//!
//! Treats each day as a Bernoulli trial: the weekly probability is the
//! fraction of the week's seven days with at least one recorded incident.
//! Values are not clipped; a week can only exceed 1.0 if the input has
//! more than seven distinct days in one week, which bucketing rules out.

use std::collections::BTreeMap;

use exposure_incident_models::IncidentType;
use exposure_pipeline_models::{DAYS_PER_WEEK, WeekKey, WeeklyIndicator, WeeklyProbability};

/// Sums day indicators per `(week, locality, type)` and divides by 7.
///
/// Output is ordered by week, then locality, then type.
#[must_use]
pub fn weekly_probabilities(indicators: &[WeeklyIndicator]) -> Vec<WeeklyProbability> {
    let mut attacked_days: BTreeMap<(WeekKey, &str, IncidentType), u32> = BTreeMap::new();
    for row in indicators {
        *attacked_days
            .entry((row.week, row.locality.as_str(), row.incident_type))
            .or_default() += row.indicator();
    }

    let probabilities: Vec<WeeklyProbability> = attacked_days
        .into_iter()
        .map(|((week, locality, incident_type), days)| WeeklyProbability {
            week,
            locality: locality.to_string(),
            incident_type,
            probability: f64::from(days) / DAYS_PER_WEEK,
        })
        .collect();

    log::info!("Estimated {} weekly probabilities", probabilities.len());
    probabilities
}
