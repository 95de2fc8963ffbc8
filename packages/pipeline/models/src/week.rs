//! Sunday-start week numbering.
//!
//! Weeks follow the `%U` convention: week 01 begins on the first Sunday of
//! the year and any days before it fall into week 00. The same function
//! buckets events and generates the densified calendar, so the two can
//! never disagree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike as _, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Highest week number `%U` can produce.
const MAX_WEEK: u32 = 53;

/// A `(year, week-of-year)` bucket key.
///
/// Ordering is chronological: by year, then by week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    /// Creates a key from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if `week` is greater than 53.
    pub const fn new(year: i32, week: u32) -> Result<Self, ParseWeekKeyError> {
        if week > MAX_WEEK {
            return Err(ParseWeekKeyError::WeekOutOfRange { week });
        }
        Ok(Self { year, week })
    }

    /// Buckets a calendar date into its Sunday-start week.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let ordinal0 = date.ordinal0();
        let weekday = date.weekday().num_days_from_sunday();
        Self {
            year: date.year(),
            week: (ordinal0 + 7 - weekday) / 7,
        }
    }

    /// Calendar year of the key.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Week number within the year (0-53).
    #[must_use]
    pub const fn week(self) -> u32 {
        self.week
    }

    /// Returns the Sunday that opens this week.
    ///
    /// Week 00 resolves to the Sunday before the year's first Sunday, which
    /// may fall in the previous calendar year. Returns `None` only for
    /// years chrono cannot represent.
    #[must_use]
    pub fn week_start(self) -> Option<NaiveDate> {
        let jan1 = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
        let first_sunday = i64::from((7 - jan1.weekday().num_days_from_sunday()) % 7);
        let offset = first_sunday + 7 * (i64::from(self.week) - 1);
        jan1.checked_add_signed(TimeDelta::days(offset))
    }

    /// Every distinct week key touched by the inclusive date range
    /// `[first, last]`, in ascending order.
    ///
    /// Walks the range day by day so that split weeks at a year boundary
    /// (e.g. `2004-52` followed by `2005-00`) both appear, exactly as the
    /// event bucketing would produce them.
    #[must_use]
    pub fn calendar(first: NaiveDate, last: NaiveDate) -> Vec<Self> {
        let mut keys: Vec<Self> = Vec::new();
        for day in first.iter_days().take_while(|d| *d <= last) {
            let key = Self::from_date(day);
            if keys.last() != Some(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.week)
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

impl FromStr for WeekKey {
    type Err = ParseWeekKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseWeekKeyError::Malformed {
            value: s.to_string(),
        };
        let (year, week) = s.split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || week.len() != 2 {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let week: u32 = week.parse().map_err(|_| malformed())?;
        Self::new(year, week)
    }
}

impl TryFrom<String> for WeekKey {
    type Error = ParseWeekKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Error returned when a `"YYYY-WW"` string cannot be turned into a
/// [`WeekKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWeekKeyError {
    /// Not of the form `YYYY-WW`.
    Malformed {
        /// The rejected input.
        value: String,
    },
    /// Week number above 53.
    WeekOutOfRange {
        /// The rejected week number.
        week: u32,
    },
}

impl fmt::Display for ParseWeekKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { value } => {
                write!(f, "invalid week key '{value}': expected YYYY-WW")
            }
            Self::WeekOutOfRange { week } => {
                write!(f, "invalid week number {week}: expected 0-{MAX_WEEK}")
            }
        }
    }
}

impl std::error::Error for ParseWeekKeyError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn matches_sunday_start_numbering() {
        // 2004-01-01 is a Thursday: week 00 until the first Sunday.
        assert_eq!(WeekKey::from_date(date(2004, 1, 1)).to_string(), "2004-00");
        assert_eq!(WeekKey::from_date(date(2004, 1, 3)).to_string(), "2004-00");
        assert_eq!(WeekKey::from_date(date(2004, 1, 4)).to_string(), "2004-01");
        assert_eq!(WeekKey::from_date(date(2004, 4, 5)).to_string(), "2004-14");
        assert_eq!(WeekKey::from_date(date(2004, 12, 31)).to_string(), "2004-52");
        // 2006-01-01 is a Sunday: no week 00 days that year.
        assert_eq!(WeekKey::from_date(date(2006, 1, 1)).to_string(), "2006-01");
    }

    #[test]
    fn week_start_is_the_opening_sunday() {
        let key = WeekKey::from_date(date(2004, 4, 5));
        assert_eq!(key.week_start(), Some(date(2004, 4, 4)));

        let week_zero: WeekKey = "2005-00".parse().unwrap();
        assert_eq!(week_zero.week_start(), Some(date(2004, 12, 26)));
    }

    #[test]
    fn every_day_falls_in_the_week_that_starts_before_it() {
        for day in date(2003, 3, 1).iter_days().take(800) {
            let start = WeekKey::from_date(day).week_start().unwrap();
            let gap = (day - start).num_days();
            assert!((0..7).contains(&gap), "{day} -> {start}");
        }
    }

    #[test]
    fn calendar_includes_split_year_boundary_weeks() {
        let keys = WeekKey::calendar(date(2004, 12, 20), date(2005, 1, 10));
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["2004-51", "2004-52", "2005-00", "2005-01", "2005-02"]
        );
    }

    #[test]
    fn calendar_covers_a_partial_last_week() {
        // Wednesday to the following Monday spans two Sunday-start weeks.
        let keys = WeekKey::calendar(date(2004, 4, 7), date(2004, 4, 12));
        assert_eq!(keys.len(), 2);
        assert!(WeekKey::calendar(date(2004, 4, 12), date(2004, 4, 7)).is_empty());
    }

    #[test]
    fn parses_and_rejects() {
        let key: WeekKey = "2005-10".parse().unwrap();
        assert_eq!((key.year(), key.week()), (2005, 10));
        assert!("2005-54".parse::<WeekKey>().is_err());
        assert!("2005-1".parse::<WeekKey>().is_err());
        assert!("200510".parse::<WeekKey>().is_err());
    }

    #[test]
    fn ordering_is_chronological() {
        let a: WeekKey = "2004-52".parse().unwrap();
        let b: WeekKey = "2005-00".parse().unwrap();
        let c: WeekKey = "2005-01".parse().unwrap();
        assert!(a < b && b < c);
    }
}
