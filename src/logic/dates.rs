//! Calendar date parsing
//!
//! The API sends dates either as `YYYY-MM-DD` or as full timestamps such as
//! `2024-01-01T00:00:00.000000Z`. Both are read as a plain calendar date by
//! dropping everything after the `T` and parsing the `Y-M-D` components
//! directly. Converting through a timezone-aware parser would shift dates near
//! midnight by one day depending on the local offset.

use chrono::NaiveDate;

/// Parse the calendar date part of an API date or timestamp
///
/// Returns `None` for empty or malformed input instead of failing.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use wargatui::logic::dates::parse_local_date;
///
/// let jan_first = NaiveDate::from_ymd_opt(2024, 1, 1);
/// assert_eq!(parse_local_date("2024-01-01"), jan_first);
/// assert_eq!(parse_local_date("2024-01-01T23:30:00+07:00"), jan_first);
/// assert_eq!(parse_local_date("2024-01-01T00:00:00.000000Z"), jan_first);
/// assert_eq!(parse_local_date("kemarin"), None);
/// assert_eq!(parse_local_date("2024-02-30"), None);
/// ```
pub fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next()?;
    // MySQL-style "2024-01-01 10:00:00" timestamps
    let date_part = date_part.split(' ').next()?;

    let mut components = date_part.split('-');
    let year: i32 = components.next()?.parse().ok()?;
    let month: u32 = components.next()?.parse().ok()?;
    let day: u32 = components.next()?.parse().ok()?;
    if components.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse an optional API date, treating absent and malformed values alike
pub fn parse_optional_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(parse_local_date)
}

/// Whole days from `today` until `date` (negative when `date` is in the past)
pub fn days_until(today: NaiveDate, date: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_local_date("2024-03-15"), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_parse_ignores_time_and_offset() {
        // Late evening in UTC+7 is still the same calendar day
        assert_eq!(
            parse_local_date("2024-03-15T23:59:59+07:00"),
            Some(ymd(2024, 3, 15))
        );
        // UTC midnight must not roll back to the previous day
        assert_eq!(
            parse_local_date("2024-03-15T00:00:00Z"),
            Some(ymd(2024, 3, 15))
        );
    }

    #[test]
    fn test_parse_space_separated_timestamp() {
        assert_eq!(
            parse_local_date("2023-12-01 08:15:00"),
            Some(ymd(2023, 12, 1))
        );
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        assert_eq!(parse_local_date("  2024-01-02 "), Some(ymd(2024, 1, 2)));
    }

    #[test]
    fn test_parse_malformed_returns_none() {
        assert_eq!(parse_local_date(""), None);
        assert_eq!(parse_local_date("T10:00:00"), None);
        assert_eq!(parse_local_date("2024-13-01"), None);
        assert_eq!(parse_local_date("2024/01/01"), None);
        assert_eq!(parse_local_date("2024-01"), None);
        assert_eq!(parse_local_date("2024-01-01-05"), None);
        assert_eq!(parse_local_date("01-01-2024x"), None);
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None), None);
        assert_eq!(parse_optional_date(Some("bukan tanggal")), None);
        assert_eq!(
            parse_optional_date(Some("2024-01-01")),
            Some(ymd(2024, 1, 1))
        );
    }

    #[test]
    fn test_days_until() {
        let today = ymd(2024, 1, 30);
        assert_eq!(days_until(today, ymd(2024, 2, 2)), 3);
        assert_eq!(days_until(today, today), 0);
        assert_eq!(days_until(today, ymd(2024, 1, 29)), -1);
    }
}
