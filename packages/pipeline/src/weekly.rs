//! Weekly aggregator.
//!
//! Tags each daily count with its Sunday-start week and collapses the count
//! to a binary "attacked that day" indicator. Date granularity is kept so
//! the estimator can sum days within a week.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use exposure_incident_models::IncidentType;
use exposure_pipeline_models::{DailyCount, WeekKey, WeeklyIndicator};

/// Builds one indicator per `(date, week, locality, type)`.
///
/// Output follows the input's date, locality, type ordering.
#[must_use]
pub fn weekly_indicators(daily: &[DailyCount]) -> Vec<WeeklyIndicator> {
    let mut grouped: BTreeMap<(NaiveDate, WeekKey, &str, IncidentType), u64> = BTreeMap::new();
    for row in daily {
        let key = (
            row.attack_date,
            WeekKey::from_date(row.attack_date),
            row.locality.as_str(),
            row.incident_type,
        );
        *grouped.entry(key).or_default() += row.attacks;
    }

    let indicators: Vec<WeeklyIndicator> = grouped
        .into_iter()
        .map(
            |((attack_date, week, locality, incident_type), attacks)| WeeklyIndicator {
                attack_date,
                week,
                locality: locality.to_string(),
                incident_type,
                was_attacked: attacks > 0,
            },
        )
        .collect();

    log::debug!("Tagged {} daily indicators with weeks", indicators.len());
    indicators
}
