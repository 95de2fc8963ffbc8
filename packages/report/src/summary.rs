//! Locality list, week-start bounds and threshold counts.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use exposure_pipeline_models::{AdjustedRow, WeekKey};
use serde::Serialize;

use crate::ReportError;

/// "At least as likely as not."
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Sorted distinct localities.
#[must_use]
pub fn localities(rows: &[AdjustedRow]) -> Vec<String> {
    rows.iter()
        .map(|r| r.locality.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

/// Earliest and latest week-start date for `locality`, or `None` if the
/// locality has no rows.
#[must_use]
pub fn week_start_range(rows: &[AdjustedRow], locality: &str) -> Option<(NaiveDate, NaiveDate)> {
    rows.iter()
        .filter(|r| r.locality == locality)
        .filter_map(|r| r.year_week.week_start())
        .fold(None, |range, start| match range {
            None => Some((start, start)),
            Some((lo, hi)) => Some((lo.min(start), hi.max(start))),
        })
}

/// Parameters for [`summarize`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    /// Locality to report on.
    pub locality: String,
    /// Inclusive lower bound on week-start date; defaults to the earliest.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on week-start date; defaults to the latest.
    pub to: Option<NaiveDate>,
    /// Values at or above this count as exposed weeks.
    pub threshold: f64,
}

impl ReportQuery {
    /// Query over the full range with the default threshold.
    #[must_use]
    pub fn new(locality: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
            from: None,
            to: None,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// One week of the two displayed series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Week bucket.
    pub year_week: WeekKey,
    /// Sunday that opens the week.
    pub week_start: NaiveDate,
    /// Adjusted enemy-action probability.
    pub enemy_action: f64,
    /// Adjusted explosive-hazard probability.
    pub explosive_hazard: f64,
}

/// Result of [`summarize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalitySummary {
    /// Locality reported on.
    pub locality: String,
    /// Effective inclusive lower bound.
    pub from: NaiveDate,
    /// Effective inclusive upper bound.
    pub to: NaiveDate,
    /// Threshold applied to both series.
    pub threshold: f64,
    /// Weeks with enemy action at or above the threshold.
    pub enemy_action_weeks: usize,
    /// Weeks with explosive hazard at or above the threshold.
    pub explosive_hazard_weeks: usize,
    /// Weekly values inside the range, ordered by week start.
    pub series: Vec<SeriesPoint>,
}

/// Filters `rows` to one locality and date range and counts the weeks at
/// or above the threshold for the two displayed incident types.
///
/// # Errors
///
/// * [`ReportError::UnknownLocality`] if the locality has no rows.
/// * [`ReportError::InvalidQuery`] if `from` is after `to` or the threshold
///   is not finite.
pub fn summarize(
    rows: &[AdjustedRow],
    query: &ReportQuery,
) -> Result<LocalitySummary, ReportError> {
    if !query.threshold.is_finite() {
        return Err(ReportError::InvalidQuery {
            message: format!("threshold {} is not a finite number", query.threshold),
        });
    }

    let (min, max) =
        week_start_range(rows, &query.locality).ok_or_else(|| ReportError::UnknownLocality {
            locality: query.locality.clone(),
        })?;
    let from = query.from.unwrap_or(min);
    let to = query.to.unwrap_or(max);
    if from > to {
        return Err(ReportError::InvalidQuery {
            message: format!("range start {from} is after range end {to}"),
        });
    }

    let mut series: Vec<SeriesPoint> = rows
        .iter()
        .filter(|r| r.locality == query.locality)
        .filter_map(|r| {
            let week_start = r.year_week.week_start()?;
            (from..=to).contains(&week_start).then_some(SeriesPoint {
                year_week: r.year_week,
                week_start,
                enemy_action: r.adjusted.enemy_action,
                explosive_hazard: r.adjusted.explosive_hazard,
            })
        })
        .collect();
    series.sort_by_key(|p| (p.week_start, p.year_week));

    let enemy_action_weeks = series
        .iter()
        .filter(|p| p.enemy_action >= query.threshold)
        .count();
    let explosive_hazard_weeks = series
        .iter()
        .filter(|p| p.explosive_hazard >= query.threshold)
        .count();

    log::debug!(
        "{}: {} weeks in {from}..={to}, {enemy_action_weeks} enemy action / {explosive_hazard_weeks} explosive hazard at >= {}",
        query.locality,
        series.len(),
        query.threshold
    );

    Ok(LocalitySummary {
        locality: query.locality.clone(),
        from,
        to,
        threshold: query.threshold,
        enemy_action_weeks,
        explosive_hazard_weeks,
        series,
    })
}

#[cfg(test)]
mod tests {
    use exposure_incident_models::TypeValues;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(locality: &str, week: &str, enemy_action: f64, explosive_hazard: f64) -> AdjustedRow {
        AdjustedRow {
            year_week: week.parse().unwrap(),
            locality: locality.to_string(),
            adjusted: TypeValues {
                enemy_action,
                explosive_hazard,
                ..TypeValues::ZERO
            },
        }
    }

    fn sample() -> Vec<AdjustedRow> {
        vec![
            row("Ramadi", "2005-01", 0.1, 0.0),
            row("Baghdad", "2005-01", 0.5, 0.2),
            row("Baghdad", "2005-02", 0.7, 0.6),
            row("Baghdad", "2005-03", 0.49, 0.5),
            row("Baghdad", "2005-04", 0.0, 0.0),
        ]
    }

    #[test]
    fn localities_are_sorted_and_distinct() {
        assert_eq!(localities(&sample()), vec!["Baghdad", "Ramadi"]);
    }

    #[test]
    fn range_uses_week_start_sundays() {
        let (lo, hi) = week_start_range(&sample(), "Baghdad").unwrap();
        assert_eq!(lo, date(2005, 1, 2));
        assert_eq!(hi, date(2005, 1, 23));
        assert!(week_start_range(&sample(), "Mosul").is_none());
    }

    #[test]
    fn counts_weeks_at_or_above_threshold() {
        let summary = summarize(&sample(), &ReportQuery::new("Baghdad")).unwrap();
        assert_eq!(summary.series.len(), 4);
        assert_eq!(summary.enemy_action_weeks, 2);
        assert_eq!(summary.explosive_hazard_weeks, 2);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let query = ReportQuery {
            from: Some(date(2005, 1, 9)),
            to: Some(date(2005, 1, 16)),
            ..ReportQuery::new("Baghdad")
        };
        let summary = summarize(&sample(), &query).unwrap();
        let weeks: Vec<String> = summary.series.iter().map(|p| p.year_week.to_string()).collect();
        assert_eq!(weeks, vec!["2005-02", "2005-03"]);
        assert_eq!(summary.enemy_action_weeks, 1);
        assert_eq!(summary.explosive_hazard_weeks, 2);
    }

    #[test]
    fn custom_threshold() {
        let query = ReportQuery {
            threshold: 0.65,
            ..ReportQuery::new("Baghdad")
        };
        let summary = summarize(&sample(), &query).unwrap();
        assert_eq!(summary.enemy_action_weeks, 1);
        assert_eq!(summary.explosive_hazard_weeks, 0);
    }

    #[test]
    fn unknown_locality_is_an_error() {
        assert!(matches!(
            summarize(&sample(), &ReportQuery::new("Mosul")),
            Err(ReportError::UnknownLocality { .. })
        ));
    }

    #[test]
    fn inverted_range_is_an_error() {
        let query = ReportQuery {
            from: Some(date(2005, 2, 1)),
            to: Some(date(2005, 1, 1)),
            ..ReportQuery::new("Baghdad")
        };
        assert!(matches!(
            summarize(&sample(), &query),
            Err(ReportError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn summary_serializes_weeks_as_strings() {
        let summary = summarize(&sample(), &ReportQuery::new("Ramadi")).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["series"][0]["yearWeek"], "2005-01");
        assert_eq!(json["series"][0]["weekStart"], "2005-01-02");
        assert_eq!(json["enemyActionWeeks"], 0);
    }
}
