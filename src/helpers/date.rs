//! Date helper functions
//!
//! Publication dates are shown in a fixed day-month-year form with
//! Portuguese (Brazil) month abbreviations, e.g. "19 abr 2021".

use chrono::{DateTime, Datelike, FixedOffset};
use thiserror::Error;

/// Lowercase pt-BR month abbreviations, indexed by zero-based month.
const PT_BR_MONTHS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Errors from publication date handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    /// The document carries no publication timestamp.
    #[error("missing publication timestamp")]
    MissingTimestamp,
}

/// Format a timestamp as "dd mmm yyyy" in the site locale.
///
/// # Examples
/// ```ignore
/// format_day_month_year(&date) // -> "19 abr 2021"
/// ```
pub fn format_day_month_year(date: &DateTime<FixedOffset>) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        PT_BR_MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Publication label for an optional timestamp.
///
/// A missing timestamp is a typed failure; the caller decides the display
/// fallback instead of this function guessing one.
pub fn published_label(date: Option<&DateTime<FixedOffset>>) -> Result<String, DateError> {
    date.map(format_day_month_year)
        .ok_or(DateError::MissingTimestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_format_day_month_year() {
        let date = parse("2021-04-19T10:00:00+00:00");
        assert_eq!(format_day_month_year(&date), "19 abr 2021");
    }

    #[test]
    fn test_format_pads_single_digit_days() {
        let date = parse("2022-01-01T00:00:00-03:00");
        assert_eq!(format_day_month_year(&date), "01 jan 2022");
    }

    #[test]
    fn test_format_is_deterministic() {
        let date = parse("2021-12-31T23:59:59+00:00");
        assert_eq!(format_day_month_year(&date), format_day_month_year(&date));
        assert_eq!(format_day_month_year(&date), "31 dez 2021");
    }

    #[test]
    fn test_published_label_missing_timestamp() {
        assert_eq!(published_label(None), Err(DateError::MissingTimestamp));

        let date = parse("2021-04-19T10:00:00+00:00");
        assert_eq!(published_label(Some(&date)).unwrap(), "19 abr 2021");
    }
}
