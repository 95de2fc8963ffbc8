//! Adjuster.
//!
//! A week with a nonzero observed probability keeps it; a week without one
//! takes the locality's trailing rolling mean instead of a hard zero.

use exposure_pipeline_models::{AdjustedRow, DenseRow};

/// Picks the adjusted value for one column.
#[must_use]
pub fn adjusted_value(raw: f64, rolling: f64) -> f64 {
    if raw == 0.0 { rolling } else { raw }
}

/// Produces the final table, preserving row order.
#[must_use]
pub fn adjust(rows: &[DenseRow]) -> Vec<AdjustedRow> {
    let adjusted: Vec<AdjustedRow> = rows
        .iter()
        .map(|row| AdjustedRow {
            year_week: row.week,
            locality: row.locality.clone(),
            adjusted: row.raw.zip_with(&row.rolling, adjusted_value),
        })
        .collect();

    let imputed = rows
        .iter()
        .flat_map(|row| row.raw.iter().zip(row.rolling.iter()))
        .filter(|((_, raw), (_, rolling))| *raw == 0.0 && *rolling > 0.0)
        .count();
    log::info!(
        "Adjusted {} rows ({imputed} values imputed from rolling means)",
        adjusted.len()
    );

    adjusted
}

#[cfg(test)]
mod tests {
    use exposure_incident_models::{IncidentType, TypeValues};

    use super::*;

    fn dense(raw: f64, rolling: f64) -> DenseRow {
        DenseRow {
            week: "2005-10".parse().unwrap(),
            locality: "Baghdad".to_string(),
            raw: TypeValues::ZERO.with(IncidentType::EnemyAction, raw),
            rolling: TypeValues::ZERO.with(IncidentType::EnemyAction, rolling),
        }
    }

    #[test]
    fn zero_raw_borrows_rolling_mean() {
        let rows = adjust(&[dense(0.0, 0.3)]);
        assert!((rows[0].adjusted.enemy_action - 0.3).abs() < f64::EPSILON);
        assert_eq!(rows[0].year_week.to_string(), "2005-10");
        assert_eq!(rows[0].locality, "Baghdad");
    }

    #[test]
    fn nonzero_raw_is_kept() {
        let rows = adjust(&[dense(0.6, 0.1)]);
        assert!((rows[0].adjusted.enemy_action - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_only_when_both_are_zero() {
        let rows = adjust(&[dense(0.0, 0.0)]);
        assert!(rows[0].adjusted.is_zero());
    }
}
