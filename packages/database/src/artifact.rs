//! Parquet artifact holding the adjusted weekly probabilities.
//!
//! Schema, one row per `(locality, week)`:
//!
//! | column | type |
//! |---|---|
//! | `year_week` | `VARCHAR` (`"YYYY-WW"`) |
//! | `locality` | `VARCHAR` |
//! | `enemy_action_adj` | `DOUBLE` |
//! | `explosive_hazard_adj` | `DOUBLE` |
//! | `friendly_fire_adj` | `DOUBLE` |
//! | `host_nation_activity_adj` | `DOUBLE` |
//!
//! Rows are staged in an in-memory `DuckDB` table and exported with
//! `COPY ... (FORMAT PARQUET)` to a temporary file that is renamed over the
//! destination, so readers never observe a partial artifact. The export runs
//! on one thread with a fixed row order, which keeps the file
//! byte-identical across runs over the same rows.

use std::path::Path;

use duckdb::Connection;
use exposure_incident_models::{IncidentType, TypeValues};
use exposure_pipeline_models::AdjustedRow;

use crate::ArtifactError;

/// Number of rows per INSERT chunk.
const CHUNK_SIZE: usize = 5_000;

/// Key columns, in file order.
const KEY_COLUMNS: [&str; 2] = ["year_week", "locality"];

/// Name of the staging table inside the in-memory database.
const STAGING_TABLE: &str = "probabilities";

/// Column name holding the adjusted value for `incident_type`.
#[must_use]
pub fn value_column(incident_type: IncidentType) -> String {
    format!("{}_adj", incident_type.column())
}

/// All artifact columns, in file order.
#[must_use]
pub fn columns() -> Vec<String> {
    KEY_COLUMNS
        .iter()
        .map(|c| (*c).to_string())
        .chain(IncidentType::all().iter().map(|t| value_column(*t)))
        .collect()
}

/// Writes `rows` to `path`, replacing any existing file.
///
/// Nothing is left at `path` or next to it if the export fails.
///
/// # Errors
///
/// Returns [`ArtifactError`] if the parent directory cannot be created, the
/// export fails, or the temporary file cannot be renamed.
pub fn write_artifact(path: &Path, rows: &[AdjustedRow]) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        crate::paths::ensure_dir(parent)?;
    }

    let tmp_path = path.with_extension("parquet.tmp");
    if tmp_path.exists() {
        std::fs::remove_file(&tmp_path)?;
    }

    if let Err(e) = export(&tmp_path, rows) {
        if tmp_path.exists() {
            if let Err(cleanup) = std::fs::remove_file(&tmp_path) {
                log::warn!("Failed to remove {}: {cleanup}", tmp_path.display());
            }
        }
        return Err(e);
    }

    std::fs::rename(&tmp_path, path)?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn export(target: &Path, rows: &[AdjustedRow]) -> Result<(), ArtifactError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("SET threads = 1;")?;

    let value_columns: Vec<String> = IncidentType::all()
        .iter()
        .map(|t| format!("{} DOUBLE NOT NULL", value_column(*t)))
        .collect();
    conn.execute_batch(&format!(
        "CREATE TABLE {STAGING_TABLE} (
            year_week VARCHAR NOT NULL,
            locality VARCHAR NOT NULL,
            {}
        );",
        value_columns.join(",\n            ")
    ))?;

    insert_rows(&conn, rows)?;

    conn.execute_batch(&format!(
        "COPY (
            SELECT {} FROM {STAGING_TABLE} ORDER BY locality, year_week
        ) TO {} (FORMAT PARQUET);",
        columns().join(", "),
        sql_literal(target)?
    ))?;

    Ok(())
}

fn insert_rows(conn: &Connection, rows: &[AdjustedRow]) -> Result<(), ArtifactError> {
    let width = columns().len();

    for chunk in rows.chunks(CHUNK_SIZE) {
        let placeholders = format!("({})", vec!["?"; width].join(", "));
        let sql = format!(
            "INSERT INTO {STAGING_TABLE} VALUES {}",
            vec![placeholders.as_str(); chunk.len()].join(", ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let mut param_idx = 1usize;

        for row in chunk {
            stmt.raw_bind_parameter(param_idx, row.year_week.to_string())?;
            stmt.raw_bind_parameter(param_idx + 1, &row.locality)?;
            param_idx += 2;
            for (_, value) in row.adjusted.iter() {
                stmt.raw_bind_parameter(param_idx, value)?;
                param_idx += 1;
            }
        }

        stmt.raw_execute()?;
    }

    Ok(())
}

/// Reads every row of the artifact at `path`, ordered by locality then
/// week.
///
/// # Errors
///
/// * [`ArtifactError::Missing`] if no file exists at `path`.
/// * [`ArtifactError::Schema`] if a column is absent or a `year_week`
///   value is malformed.
/// * [`ArtifactError::DuckDb`] if the file is not readable Parquet.
pub fn read_artifact(path: &Path) -> Result<Vec<AdjustedRow>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }

    let conn = Connection::open_in_memory()?;
    let source = format!("read_parquet({})", sql_literal(path)?);
    check_columns(&conn, &source)?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {source} ORDER BY locality, year_week",
        columns().join(", ")
    ))?;

    let raw = stmt
        .query_map([], |row| {
            let year_week: String = row.get(0)?;
            let locality: String = row.get(1)?;
            let values = [row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?];
            Ok((year_week, locality, values))
        })?
        .collect::<Result<Vec<(String, String, [f64; 4])>, _>>()?;

    let rows = raw
        .into_iter()
        .map(|(year_week, locality, values)| {
            let year_week = year_week.parse().map_err(|e| ArtifactError::Schema {
                message: format!("year_week '{year_week}' for '{locality}': {e}"),
            })?;
            let adjusted = IncidentType::all()
                .iter()
                .zip(values)
                .fold(TypeValues::ZERO, |acc, (&t, value)| acc.with(t, value));
            Ok(AdjustedRow {
                year_week,
                locality,
                adjusted,
            })
        })
        .collect::<Result<Vec<_>, ArtifactError>>()?;

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn check_columns(conn: &Connection, source: &str) -> Result<(), ArtifactError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT column_name FROM (DESCRIBE SELECT * FROM {source})"
    ))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let missing: Vec<String> = columns()
        .into_iter()
        .filter(|c| !present.contains(c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ArtifactError::Schema {
            message: format!(
                "missing column(s) {} (found: {})",
                missing.join(", "),
                present.join(", ")
            ),
        })
    }
}

/// Quotes a path as a SQL string literal.
fn sql_literal(path: &Path) -> Result<String, ArtifactError> {
    let text = path.to_str().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("path is not valid UTF-8: {}", path.display()),
        )
    })?;
    Ok(format!("'{}'", text.replace('\'', "''")))
}
