//! CSV extract reader.
//!
//! Resolves the definition's column names against the header row and
//! returns one [`RawRecord`] per data row with the three required fields as
//! trimmed strings. No row is skipped: interpretation (and rejection) of the
//! values is the pipeline's job.

use std::io::Read;
use std::path::Path;

use crate::SourceError;
use crate::extract_def::ExtractDefinition;

/// One data row of the extract, untyped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source file (header is line 1).
    pub line: u64,
    /// Event timestamp text.
    pub timestamp: String,
    /// Locality identifier.
    pub locality: String,
    /// Incident-type label.
    pub type_label: String,
}

/// Reads every record of the extract at `path`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened, a required column
/// is missing, or a row cannot be decoded.
pub fn read_extract(path: &Path, def: &ExtractDefinition) -> Result<Vec<RawRecord>, SourceError> {
    let file = std::fs::File::open(path)?;
    let records = read_extract_from(file, def)?;
    log::info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Reads every record from an arbitrary reader.
///
/// # Errors
///
/// Returns [`SourceError`] if a required column is missing or a row cannot
/// be decoded.
pub fn read_extract_from<R: Read>(
    reader: R,
    def: &ExtractDefinition,
) -> Result<Vec<RawRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(def.delimiter_byte()?)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let timestamp_idx = column_index(&headers, &def.columns.timestamp)?;
    let locality_idx = column_index(&headers, &def.columns.locality)?;
    let type_idx = column_index(&headers, &def.columns.incident_type)?;

    let mut records = Vec::new();
    let mut row = csv::StringRecord::new();
    let mut fallback_line = 1u64;

    while reader.read_record(&mut row)? {
        fallback_line += 1;
        let line = row.position().map_or(fallback_line, csv::Position::line);
        let field = |idx: usize| row.get(idx).unwrap_or("").trim().to_owned();

        records.push(RawRecord {
            line,
            timestamp: field(timestamp_idx),
            locality: field(locality_idx),
            type_label: field(type_idx),
        });
    }

    log::debug!("Decoded {} rows using definition '{}'", records.len(), def.id);

    Ok(records)
}

fn column_index(headers: &[String], column: &str) -> Result<usize, SourceError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| SourceError::MissingColumn {
            column: column.to_string(),
            available: headers.to_vec(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_extract;

    #[test]
    fn reads_required_columns_in_any_order() {
        let csv = "type,extra,ADM3NAME,date_time_occ\n\
                   Enemy Action,x,Fallujah,2004-04-05 10:00:00\n\
                   Friendly Fire,y, Ramadi ,2004-04-06 11:00:00\n";
        let records = read_extract_from(csv.as_bytes(), &default_extract()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].type_label, "Enemy Action");
        assert_eq!(records[0].locality, "Fallujah");
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].locality, "Ramadi");
        assert_eq!(records[1].timestamp, "2004-04-06 11:00:00");
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "date_time_occ,type\n2004-04-05,Enemy Action\n";
        let err = read_extract_from(csv.as_bytes(), &default_extract()).unwrap_err();
        match err {
            SourceError::MissingColumn { column, available } => {
                assert_eq!(column, "ADM3NAME");
                assert_eq!(available, vec!["date_time_occ", "type"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_rows_yield_empty_fields() {
        let csv = "date_time_occ,ADM3NAME,type\n2004-04-05,Fallujah\n";
        let records = read_extract_from(csv.as_bytes(), &default_extract()).unwrap();
        assert_eq!(records[0].type_label, "");
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "date_time_occ,ADM3NAME,type\n";
        let records = read_extract_from(csv.as_bytes(), &default_extract()).unwrap();
        assert!(records.is_empty());
    }
}
