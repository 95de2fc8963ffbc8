//! Event normalizer.
//!
//! Parses untyped extract records into [`RawEvent`]s, derives the calendar
//! domain, and counts events per `(date, locality, type)`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use exposure_incident_models::IncidentType;
use exposure_pipeline_models::{DailyCount, ObservedDomain, RawEvent};
use exposure_source::extract_def::{ExtractDefinition, UnmappedTypePolicy};
use exposure_source::parsing::{days_in_month, parse_attack_date};
use exposure_source::reader::RawRecord;
use exposure_source::type_mapping::LabelMap;

use crate::PipelineError;

/// Parsed events plus the domain they span.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedExtract {
    /// Events with a tracked incident type.
    pub events: Vec<RawEvent>,
    /// Localities and date range over every parsed record, tracked type or
    /// not.
    pub domain: ObservedDomain,
}

/// Parses every record. Fails on the first invalid one; nothing is
/// silently dropped.
///
/// # Errors
///
/// * [`PipelineError::EmptyInput`] if `records` is empty.
/// * [`PipelineError::InputFormat`] for an unparseable timestamp or an
///   empty locality.
/// * [`PipelineError::UnknownIncidentType`] for an unmapped label when the
///   definition's policy is `reject`.
pub fn normalize(
    records: &[RawRecord],
    def: &ExtractDefinition,
) -> Result<NormalizedExtract, PipelineError> {
    if records.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let labels = LabelMap::new(&def.types);
    let mut events = Vec::with_capacity(records.len());
    let mut domain: Option<ObservedDomain> = None;
    let mut untracked: BTreeMap<&str, u64> = BTreeMap::new();

    for record in records {
        let attack_date = parse_attack_date(&record.timestamp, &def.timestamp_formats)
            .ok_or_else(|| PipelineError::InputFormat {
                line: record.line,
                message: format!("unparseable timestamp '{}'", record.timestamp),
            })?;

        if record.locality.is_empty() {
            return Err(PipelineError::InputFormat {
                line: record.line,
                message: "empty locality".to_string(),
            });
        }

        match domain.as_mut() {
            Some(domain) => domain.observe(attack_date, &record.locality),
            None => domain = Some(ObservedDomain::new(attack_date, &record.locality)),
        }

        match labels.map(&record.type_label) {
            Some(incident_type) => events.push(RawEvent {
                attack_date,
                locality: record.locality.clone(),
                incident_type,
            }),
            None => match def.unmapped_types {
                UnmappedTypePolicy::Ignore => {
                    *untracked.entry(record.type_label.as_str()).or_default() += 1;
                }
                UnmappedTypePolicy::Reject => {
                    return Err(PipelineError::UnknownIncidentType {
                        line: record.line,
                        label: record.type_label.clone(),
                    });
                }
            },
        }
    }

    for (label, count) in &untracked {
        log::warn!("Ignoring {count} record(s) with untracked type '{label}'");
    }

    let domain = domain.ok_or(PipelineError::EmptyInput)?;
    log::info!(
        "Normalized {} events ({} untracked) across {} localities, {} to {}",
        events.len(),
        untracked.values().sum::<u64>(),
        domain.localities.len(),
        domain.first,
        domain.last
    );

    Ok(NormalizedExtract { events, domain })
}

/// Counts events per `(date, locality, type)`.
///
/// Output is ordered by date, then locality, then type.
#[must_use]
pub fn count_daily(events: &[RawEvent]) -> Vec<DailyCount> {
    let mut counts: BTreeMap<(NaiveDate, &str, IncidentType), u64> = BTreeMap::new();
    for event in events {
        *counts
            .entry((event.attack_date, event.locality.as_str(), event.incident_type))
            .or_default() += 1;
    }

    let daily: Vec<DailyCount> = counts
        .into_iter()
        .map(|((attack_date, locality, incident_type), attacks)| DailyCount {
            attack_date,
            locality: locality.to_string(),
            incident_type,
            days_in_month: days_in_month(attack_date),
            attacks,
        })
        .collect();

    log::debug!("Counted {} daily rows from {} events", daily.len(), events.len());
    daily
}

#[cfg(test)]
mod tests {
    use exposure_source::registry::default_extract;

    use super::*;

    fn record(line: u64, timestamp: &str, locality: &str, label: &str) -> RawRecord {
        RawRecord {
            line,
            timestamp: timestamp.to_string(),
            locality: locality.to_string(),
            type_label: label.to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = normalize(&[], &default_extract()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[test]
    fn malformed_timestamp_names_the_line() {
        let records = vec![
            record(2, "2004-04-05 10:00:00", "Fallujah", "Enemy Action"),
            record(3, "yesterday", "Fallujah", "Enemy Action"),
        ];
        match normalize(&records, &default_extract()).unwrap_err() {
            PipelineError::InputFormat { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("yesterday"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_locality_is_rejected() {
        let records = vec![record(2, "2004-04-05", "", "Enemy Action")];
        assert!(matches!(
            normalize(&records, &default_extract()),
            Err(PipelineError::InputFormat { line: 2, .. })
        ));
    }

    #[test]
    fn untracked_types_widen_the_domain_only() {
        let records = vec![
            record(2, "2004-04-05", "Fallujah", "Enemy Action"),
            record(3, "2004-06-01", "Basra", "Criminal Event"),
        ];
        let normalized = normalize(&records, &default_extract()).unwrap();
        assert_eq!(normalized.events.len(), 1);
        assert_eq!(normalized.domain.last, date(2004, 6, 1));
        assert!(normalized.domain.localities.contains("Basra"));
    }

    #[test]
    fn reject_policy_fails_on_untracked_types() {
        let mut def = default_extract();
        def.unmapped_types = UnmappedTypePolicy::Reject;
        let records = vec![record(7, "2004-04-05", "Basra", "Criminal Event")];
        assert!(matches!(
            normalize(&records, &def),
            Err(PipelineError::UnknownIncidentType { line: 7, .. })
        ));
    }

    #[test]
    fn counts_are_grouped_and_ordered() {
        let events = vec![
            RawEvent {
                attack_date: date(2004, 4, 6),
                locality: "Fallujah".to_string(),
                incident_type: IncidentType::EnemyAction,
            },
            RawEvent {
                attack_date: date(2004, 4, 5),
                locality: "Ramadi".to_string(),
                incident_type: IncidentType::ExplosiveHazard,
            },
            RawEvent {
                attack_date: date(2004, 4, 5),
                locality: "Fallujah".to_string(),
                incident_type: IncidentType::EnemyAction,
            },
            RawEvent {
                attack_date: date(2004, 4, 5),
                locality: "Fallujah".to_string(),
                incident_type: IncidentType::EnemyAction,
            },
        ];
        let daily = count_daily(&events);
        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0].attack_date, date(2004, 4, 5));
        assert_eq!(daily[0].locality, "Fallujah");
        assert_eq!(daily[0].attacks, 2);
        assert_eq!(daily[0].days_in_month, 30);
        assert_eq!(daily[1].locality, "Ramadi");
        assert_eq!(daily[2].attack_date, date(2004, 4, 6));
    }
}
