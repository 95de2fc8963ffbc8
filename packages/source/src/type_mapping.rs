//! Incident type label mapping.
//!
//! Maps extract-specific type labels to the canonical [`IncidentType`].
//! Labels outside the four tracked categories (e.g. `"Criminal Event"`)
//! map to `None`.

use std::collections::BTreeMap;

use exposure_incident_models::IncidentType;

use crate::extract_def::TypeLabels;

/// Case-insensitive lookup table from raw label to [`IncidentType`].
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: BTreeMap<String, IncidentType>,
}

impl LabelMap {
    /// Builds the lookup table from an extract definition's labels.
    ///
    /// When the same label is listed under two types, the later type in
    /// [`IncidentType::all`] order wins and a warning is logged.
    #[must_use]
    pub fn new(types: &TypeLabels) -> Self {
        let mut labels = BTreeMap::new();
        for &incident_type in IncidentType::all() {
            for label in labels_for(types, incident_type) {
                let key = normalize(label);
                if let Some(previous) = labels.insert(key, incident_type) {
                    log::warn!(
                        "Label '{label}' listed for both {} and {}",
                        previous.label(),
                        incident_type.label()
                    );
                }
            }
        }
        Self { labels }
    }

    /// Maps a raw label to its incident type, if tracked.
    #[must_use]
    pub fn map(&self, raw: &str) -> Option<IncidentType> {
        self.labels.get(&normalize(raw)).copied()
    }
}

const fn labels_for(types: &TypeLabels, incident_type: IncidentType) -> &Vec<String> {
    match incident_type {
        IncidentType::EnemyAction => &types.enemy_action,
        IncidentType::ExplosiveHazard => &types.explosive_hazard,
        IncidentType::FriendlyFire => &types.friendly_fire,
        IncidentType::HostNationActivity => &types.host_nation_activity,
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> TypeLabels {
        TypeLabels {
            enemy_action: vec!["Enemy Action".to_string()],
            explosive_hazard: vec!["Explosive Hazard".to_string(), "IED".to_string()],
            friendly_fire: vec!["Friendly Fire".to_string()],
            host_nation_activity: vec!["Host Nation Activity".to_string()],
        }
    }

    #[test]
    fn maps_case_insensitively() {
        let map = LabelMap::new(&labels());
        assert_eq!(map.map("enemy action"), Some(IncidentType::EnemyAction));
        assert_eq!(map.map("  ENEMY ACTION "), Some(IncidentType::EnemyAction));
        assert_eq!(map.map("ied"), Some(IncidentType::ExplosiveHazard));
    }

    #[test]
    fn duplicate_label_resolves_to_later_type() {
        let mut types = labels();
        types.friendly_fire.push("ied".to_string());
        let map = LabelMap::new(&types);
        assert_eq!(map.map("IED"), Some(IncidentType::FriendlyFire));
    }

    #[test]
    fn untracked_labels_map_to_none() {
        let map = LabelMap::new(&labels());
        assert_eq!(map.map("Criminal Event"), None);
        assert_eq!(map.map(""), None);
    }
}
