#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed row schemas for every stage of the exposure pipeline.
//!
//! Each stage consumes a slice of one row type and returns a freshly built
//! `Vec` of the next. Columns are named struct fields rather than string
//! lookups, so a schema change between stages is a compile error instead of
//! a silently missing column.

pub mod week;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use exposure_incident_models::{IncidentType, TypeValues};
use serde::{Deserialize, Serialize};

pub use week::{ParseWeekKeyError, WeekKey};

/// Number of days every week is assumed to contain when converting day
/// indicators into a weekly probability.
pub const DAYS_PER_WEEK: f64 = 7.0;

/// One incident from the raw extract, after timestamp and label parsing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Calendar date the incident occurred.
    pub attack_date: NaiveDate,
    /// Administrative-area identifier.
    pub locality: String,
    /// Normalized incident type.
    pub incident_type: IncidentType,
}

/// Incidents sharing a `(date, locality, type)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    /// Calendar date.
    pub attack_date: NaiveDate,
    /// Administrative-area identifier.
    pub locality: String,
    /// Incident type.
    pub incident_type: IncidentType,
    /// Number of days in `attack_date`'s month. Informational; no stage
    /// reads it.
    pub days_in_month: u32,
    /// Number of raw records grouped into this row.
    pub attacks: u64,
}

/// Whether a locality saw at least one incident of a type on a given day,
/// tagged with the week that day belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyIndicator {
    /// Calendar date.
    pub attack_date: NaiveDate,
    /// Week bucket of `attack_date`.
    pub week: WeekKey,
    /// Administrative-area identifier.
    pub locality: String,
    /// Incident type.
    pub incident_type: IncidentType,
    /// `true` iff at least one incident was recorded.
    pub was_attacked: bool,
}

impl WeeklyIndicator {
    /// The indicator as a 0/1 count.
    #[must_use]
    pub const fn indicator(&self) -> u32 {
        if self.was_attacked { 1 } else { 0 }
    }
}

/// Long-form weekly probability for a single incident type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProbability {
    /// Week bucket.
    pub week: WeekKey,
    /// Administrative-area identifier.
    pub locality: String,
    /// Incident type.
    pub incident_type: IncidentType,
    /// Fraction of the week's days with at least one incident.
    pub probability: f64,
}

/// Pivoted weekly probabilities, one column per incident type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WideRow {
    /// Week bucket.
    pub week: WeekKey,
    /// Administrative-area identifier.
    pub locality: String,
    /// Probability per type; absent types are zero.
    pub values: TypeValues,
}

/// A row of the dense `locality x week` grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenseRow {
    /// Week bucket.
    pub week: WeekKey,
    /// Administrative-area identifier.
    pub locality: String,
    /// Observed weekly probability, zero for imputed weeks.
    pub raw: TypeValues,
    /// Trailing rolling average of `raw`; zero until smoothed.
    pub rolling: TypeValues,
}

/// Final per-week, per-locality estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedRow {
    /// Week bucket, rendered as `YYYY-WW`.
    pub year_week: WeekKey,
    /// Administrative-area identifier.
    pub locality: String,
    /// Raw probability where nonzero, otherwise the rolling average.
    pub adjusted: TypeValues,
}

/// The calendar domain of an extract: the set of localities and the
/// inclusive range of attack dates.
///
/// Derived from every parsed record, including records whose type label is
/// not one of the tracked [`IncidentType`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedDomain {
    /// Earliest attack date.
    pub first: NaiveDate,
    /// Latest attack date.
    pub last: NaiveDate,
    /// Distinct localities, sorted.
    pub localities: BTreeSet<String>,
}

impl ObservedDomain {
    /// Starts a domain from a single record.
    #[must_use]
    pub fn new(date: NaiveDate, locality: &str) -> Self {
        Self {
            first: date,
            last: date,
            localities: BTreeSet::from([locality.to_string()]),
        }
    }

    /// Widens the domain to include `date` and `locality`.
    pub fn observe(&mut self, date: NaiveDate, locality: &str) {
        self.first = self.first.min(date);
        self.last = self.last.max(date);
        if !self.localities.contains(locality) {
            self.localities.insert(locality.to_string());
        }
    }

    /// All week keys from the first observed week through the last.
    #[must_use]
    pub fn weeks(&self) -> Vec<WeekKey> {
        WeekKey::calendar(self.first, self.last)
    }
}
