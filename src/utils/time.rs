//! Time helpers for database timestamps.
//!
//! Timestamps are stored as `TIMESTAMP` (no zone) holding UTC wall-clock time.

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff_diesel::ToDiesel;

use crate::error::{AppError, AppResult};

/// Current UTC time in the representation the models store.
pub fn now() -> jiff_diesel::DateTime {
    now_civil().to_diesel()
}

/// Current UTC wall-clock time.
pub fn now_civil() -> DateTime {
    jiff::Timestamp::now().to_zoned(TimeZone::UTC).datetime()
}

/// Parses a date given either as `YYYY-MM-DD` (start of day) or as an ISO
/// local date-time such as `2024-03-01T09:30:00`.
///
/// # Errors
/// `AppError::Validation` on `field` when the input matches neither form.
pub fn parse_date_or_datetime(field: &str, input: &str) -> AppResult<DateTime> {
    let value = input.trim();
    let parsed = if value.len() == 10 {
        value
            .parse::<Date>()
            .map(|date| date.to_datetime(Time::midnight()))
            .ok()
    } else {
        value.parse::<DateTime>().ok()
    };

    parsed.ok_or_else(|| AppError::Validation {
        field: field.to_string(),
        reason: format!(
            "Invalid date format: {}. Expected YYYY-MM-DD or ISO date-time format.",
            input
        ),
    })
}

/// Parses an optional, possibly blank date string.
pub fn parse_optional_date(
    field: &str,
    input: Option<&str>,
) -> AppResult<Option<jiff_diesel::DateTime>> {
    match input.map(str::trim) {
        Some(value) if !value.is_empty() => {
            parse_date_or_datetime(field, value).map(|dt| Some(dt.to_diesel()))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use proptest::prelude::*;

    #[test]
    fn test_parse_bare_date_is_start_of_day() {
        let parsed = parse_date_or_datetime("hireDate", "2024-01-15").unwrap();
        assert_eq!(parsed, date(2024, 1, 15).at(0, 0, 0, 0));
    }

    #[test]
    fn test_parse_datetime() {
        let parsed = parse_date_or_datetime("hireDate", "2024-01-15T10:30:00").unwrap();
        assert_eq!(parsed, date(2024, 1, 15).at(10, 30, 0, 0));
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        for input in ["15/01/2024", "2024-13-01", "yesterday", ""] {
            let err = parse_date_or_datetime("establishedDate", input).unwrap_err();
            match err {
                AppError::Validation { field, reason } => {
                    assert_eq!(field, "establishedDate");
                    assert!(reason.starts_with("Invalid date format"));
                    assert!(reason.contains("Expected YYYY-MM-DD"));
                }
                other => panic!("Expected Validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_optional_blank_is_none() {
        assert!(parse_optional_date("hireDate", None).unwrap().is_none());
        assert!(parse_optional_date("hireDate", Some("   ")).unwrap().is_none());
        assert!(parse_optional_date("hireDate", Some("2020-02-29")).unwrap().is_some());
    }

    proptest! {
        #[test]
        fn prop_any_valid_date_parses(y in 1970i16..2100, m in 1i8..=12, d in 1i8..=28) {
            let text = format!("{:04}-{:02}-{:02}", y, m, d);
            let parsed = parse_date_or_datetime("date", &text).unwrap();
            prop_assert_eq!(parsed, date(y, m, d).at(0, 0, 0, 0));
        }
    }
}
