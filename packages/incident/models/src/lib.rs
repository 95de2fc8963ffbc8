#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident type taxonomy and per-type value records.
//!
//! This crate defines the four incident categories tracked by the exposure
//! pipeline. Every raw extract label is normalized into [`IncidentType`],
//! and every wide table in the pipeline stores one value per type in a
//! [`TypeValues`] record so the column set is fixed at compile time.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Incident categories tracked per locality and week.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentType {
    /// Direct or indirect fire, ambushes and other hostile contact
    EnemyAction,
    /// IEDs, mines, UXO and caches
    ExplosiveHazard,
    /// Fratricide and blue-on-blue incidents
    FriendlyFire,
    /// Actions involving host-nation security forces
    HostNationActivity,
}

impl IncidentType {
    /// Human-readable label as it appears in the raw extract.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EnemyAction => "Enemy Action",
            Self::ExplosiveHazard => "Explosive Hazard",
            Self::FriendlyFire => "Friendly Fire",
            Self::HostNationActivity => "Host Nation Activity",
        }
    }

    /// Snake-case column stem used in the output artifact (`{column}_adj`).
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::EnemyAction => "enemy_action",
            Self::ExplosiveHazard => "explosive_hazard",
            Self::FriendlyFire => "friendly_fire",
            Self::HostNationActivity => "host_nation_activity",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::EnemyAction,
            Self::ExplosiveHazard,
            Self::FriendlyFire,
            Self::HostNationActivity,
        ]
    }
}

/// One `f64` value per [`IncidentType`].
///
/// Used for the wide probability, rolling-average and adjusted columns.
/// Defaults to all zeros, which is also the fill value for absent data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeValues {
    /// Enemy action column.
    pub enemy_action: f64,
    /// Explosive hazard column.
    pub explosive_hazard: f64,
    /// Friendly fire column.
    pub friendly_fire: f64,
    /// Host-nation activity column.
    pub host_nation_activity: f64,
}

impl TypeValues {
    /// All four columns set to zero.
    pub const ZERO: Self = Self {
        enemy_action: 0.0,
        explosive_hazard: 0.0,
        friendly_fire: 0.0,
        host_nation_activity: 0.0,
    };

    /// Returns the value stored for `incident_type`.
    #[must_use]
    pub const fn get(&self, incident_type: IncidentType) -> f64 {
        match incident_type {
            IncidentType::EnemyAction => self.enemy_action,
            IncidentType::ExplosiveHazard => self.explosive_hazard,
            IncidentType::FriendlyFire => self.friendly_fire,
            IncidentType::HostNationActivity => self.host_nation_activity,
        }
    }

    /// Returns a copy with the value for `incident_type` replaced.
    #[must_use]
    pub const fn with(mut self, incident_type: IncidentType, value: f64) -> Self {
        match incident_type {
            IncidentType::EnemyAction => self.enemy_action = value,
            IncidentType::ExplosiveHazard => self.explosive_hazard = value,
            IncidentType::FriendlyFire => self.friendly_fire = value,
            IncidentType::HostNationActivity => self.host_nation_activity = value,
        }
        self
    }

    /// Builds a record by evaluating `f` once per incident type.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(IncidentType) -> f64) -> Self {
        IncidentType::all()
            .iter()
            .fold(Self::ZERO, |acc, &t| acc.with(t, f(t)))
    }

    /// Combines two records column by column.
    #[must_use]
    pub fn zip_with(&self, other: &Self, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        Self::from_fn(|t| f(self.get(t), other.get(t)))
    }

    /// Iterates `(type, value)` pairs in [`IncidentType::all`] order.
    pub fn iter(&self) -> impl Iterator<Item = (IncidentType, f64)> + '_ {
        IncidentType::all().iter().map(|&t| (t, self.get(t)))
    }

    /// Returns `true` if every column is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, v)| v == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_unique() {
        let mut columns: Vec<&str> = IncidentType::all().iter().map(|t| t.column()).collect();
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns.len(), IncidentType::all().len());
    }

    #[test]
    fn display_is_screaming_snake_and_label_is_readable() {
        assert_eq!(IncidentType::EnemyAction.to_string(), "ENEMY_ACTION");
        assert_eq!(IncidentType::HostNationActivity.label(), "Host Nation Activity");
    }

    #[test]
    fn with_only_touches_one_column() {
        let values = TypeValues::ZERO.with(IncidentType::FriendlyFire, 0.5);
        assert!((values.friendly_fire - 0.5).abs() < f64::EPSILON);
        assert!((values.enemy_action).abs() < f64::EPSILON);
        assert!(!values.is_zero());
        assert!(TypeValues::default().is_zero());
    }

    #[test]
    fn zip_with_is_columnwise() {
        let a = TypeValues::from_fn(|t| if t == IncidentType::EnemyAction { 1.0 } else { 0.0 });
        let b = TypeValues::from_fn(|_| 2.0);
        let sum = a.zip_with(&b, |x, y| x + y);
        assert!((sum.enemy_action - 3.0).abs() < f64::EPSILON);
        assert!((sum.host_nation_activity - 2.0).abs() < f64::EPSILON);
    }
}
