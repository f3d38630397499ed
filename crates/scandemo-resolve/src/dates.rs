//! Header date parsing and age-in-days calculation.
//!
//! DICOM `DA` values are `YYYYMMDD`. Exports occasionally carry the ISO
//! extended form (`YYYY-MM-DD`) or the legacy dotted form (`YYYY.MM.DD`);
//! both are accepted.

use chrono::NaiveDate;

/// Parses a header date.
///
/// Returns `None` unless the value holds exactly eight digits once the
/// `-`/`.` delimiters are removed, and those digits form a valid calendar date.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use scandemo_resolve::dates::parse_header_date;
///
/// let expected = NaiveDate::from_ymd_opt(1999, 1, 1);
/// assert_eq!(parse_header_date("19990101"), expected);
/// assert_eq!(parse_header_date("1999-01-01"), expected);
/// assert_eq!(parse_header_date("19990230"), None);
/// ```
pub fn parse_header_date(value: &str) -> Option<NaiveDate> {
    let digits: String = value
        .trim()
        .chars()
        .filter(|ch| *ch != '-' && *ch != '.')
        .collect();
    if digits.len() != 8 || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let year = digits[0..4].parse::<i32>().ok()?;
    let month = digits[4..6].parse::<u32>().ok()?;
    let day = digits[6..8].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Exact calendar-day difference `scan - birth`.
///
/// Negative when the scan date precedes the birth date; the caller normalizes
/// the sign.
pub fn age_in_days(birth: NaiveDate, scan: NaiveDate) -> i64 {
    (scan - birth).num_days()
}
