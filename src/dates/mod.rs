//! Multi-format strict date parsing for CSV imports.
//!
//! Personnel exports arrive with a mix of date conventions, so parsing tries
//! an ordered table of accepted formats and takes the first full match.
//! Day/month-first formats come before the US month/day-first fallback, so
//! `01/02/2020` is 1 February 2020. There is no fuzzy matching and no locale
//! inference.
//!
//! Each chrono format is gated by a shape regex because chrono's numeric
//! fields are width-lenient: without the gate, `%Y` would happily read the
//! "20" in `01/02/20` as the year 20 instead of falling through to the
//! 2-digit-year format.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DateError, DateResult};

/// Accepted formats, in match order: (shape gate, chrono format).
static FORMATS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"^\d{1,2}/\d{1,2}/\d{4}$", "%d/%m/%Y"),
        (r"^\d{1,2}-\d{1,2}-\d{4}$", "%d-%m-%Y"),
        (r"^\d{4}-\d{2}-\d{2}$", "%Y-%m-%d"),
        (r"^\d{1,2}/\d{1,2}/\d{2}$", "%d/%m/%y"),
        // US fallback, reached when the value is not a valid day/month date
        (r"^\d{1,2}/\d{1,2}/\d{4}$", "%m/%d/%Y"),
    ]
    .into_iter()
    .map(|(shape, format)| (Regex::new(shape).expect("valid shape regex"), format))
    .collect()
});

/// Parse a date string against the accepted format table.
///
/// Blank input yields [`DateError::Empty`]; input matching no format yields
/// [`DateError::InvalidFormat`]. Both are row-level failures for the import
/// pipeline.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use rosterload::dates::parse_date;
///
/// let date = parse_date("01/02/2020").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
/// ```
pub fn parse_date(input: &str) -> DateResult<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateError::Empty);
    }

    for (shape, format) in FORMATS.iter() {
        if !shape.is_match(trimmed) {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    Err(DateError::InvalidFormat(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_month_first_wins() {
        // Ambiguous between dd/MM and MM/dd: day/month-first is earlier in
        // the table.
        assert_eq!(parse_date("01/02/2020").unwrap(), ymd(2020, 2, 1));
    }

    #[test]
    fn test_single_digit_day_and_month() {
        assert_eq!(parse_date("1/2/2020").unwrap(), ymd(2020, 2, 1));
    }

    #[test]
    fn test_dash_separator() {
        assert_eq!(parse_date("15-06-1985").unwrap(), ymd(1985, 6, 15));
    }

    #[test]
    fn test_iso_format() {
        assert_eq!(parse_date("2020-02-01").unwrap(), ymd(2020, 2, 1));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date("01/02/20").unwrap(), ymd(2020, 2, 1));
    }

    #[test]
    fn test_us_fallback_when_month_position_invalid() {
        // 25 cannot be a month, so day/month-first fails and the US format
        // takes over.
        assert_eq!(parse_date("02/25/2020").unwrap(), ymd(2020, 2, 25));
    }

    #[test]
    fn test_blank_is_distinct_error() {
        assert_eq!(parse_date(""), Err(DateError::Empty));
        assert_eq!(parse_date("   "), Err(DateError::Empty));
    }

    #[test]
    fn test_unparseable_is_invalid_format() {
        assert_eq!(
            parse_date("not-a-date"),
            Err(DateError::InvalidFormat("not-a-date".into()))
        );
        assert_eq!(
            parse_date("31/31/2020"),
            Err(DateError::InvalidFormat("31/31/2020".into()))
        );
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        assert_eq!(parse_date(" 2020-02-01 ").unwrap(), ymd(2020, 2, 1));
    }
}
