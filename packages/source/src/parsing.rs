//! Timestamp parsing for raw extract rows.

use chrono::{NaiveDate, NaiveDateTime};

/// Parses an event timestamp into its calendar date.
///
/// Each format is tried first as a full datetime and then as a bare date,
/// so a single list can mix `"%Y-%m-%d %H:%M:%S"` and `"%m/%d/%Y"` entries.
/// Returns `None` if no format matches.
#[must_use]
pub fn parse_attack_date<S: AsRef<str>>(raw: &str, formats: &[S]) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    formats.iter().find_map(|fmt| {
        let fmt = fmt.as_ref();
        NaiveDateTime::parse_from_str(raw, fmt)
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(raw, fmt))
            .ok()
    })
}

/// Number of days in the month containing `date`.
#[must_use]
pub fn days_in_month(date: NaiveDate) -> u32 {
    use chrono::Datelike as _;

    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}
