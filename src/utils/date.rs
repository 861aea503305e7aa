// Date parsing for wire payloads and command-line arguments

use chrono::{DateTime, Duration, Local, NaiveDate};
use anyhow::Result;
use serde::{Deserialize, Deserializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date as the backend sends it.
///
/// Accepts plain `YYYY-MM-DD` and RFC 3339 timestamps
/// (`2024-01-10T00:00:00.000Z`); for timestamps only the date part is kept,
/// so a stage never shifts a day because of the local offset.
pub fn parse_wire_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    // "2024-01-10 00:00:00+00" and similar database renderings
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
}

/// Parse a date expression typed by a user, relative to `today`.
///
/// Supports `YYYY-MM-DD`, `today`, `tomorrow`, `yesterday` and day offsets
/// such as `+3d` / `-2d`.
pub fn parse_date_expr_from(expr: &str, today: NaiveDate) -> Result<NaiveDate> {
    let expr = expr.trim();
    if let Ok(date) = NaiveDate::parse_from_str(expr, DATE_FORMAT) {
        return Ok(date);
    }

    match expr {
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + Duration::days(1)),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    if let Some(days) = expr.strip_suffix('d') {
        if days.starts_with('+') || days.starts_with('-') {
            if let Ok(offset) = days.parse::<i64>() {
                // Out-of-range offsets fall through to the error below
                if let Some(date) = Duration::try_days(offset).and_then(|d| today.checked_add_signed(d)) {
                    return Ok(date);
                }
            }
        }
    }

    anyhow::bail!(
        "Invalid date: '{}'. Use YYYY-MM-DD, today, tomorrow, yesterday, or an offset like +3d.",
        expr
    )
}

/// Parse a date expression relative to the local current date
pub fn parse_date_expr(expr: &str) -> Result<NaiveDate> {
    parse_date_expr_from(expr, Local::now().date_naive())
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format(DATE_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

/// Serde helper: optional date in any format `parse_wire_date` understands
pub(crate) fn deserialize_opt_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_wire_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: '{}'", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_wire_date_formats() {
        assert_eq!(parse_wire_date("2024-01-10"), Some(d(2024, 1, 10)));
        assert_eq!(parse_wire_date("2024-01-10T00:00:00.000Z"), Some(d(2024, 1, 10)));
        assert_eq!(parse_wire_date("2024-01-10 00:00:00+00"), Some(d(2024, 1, 10)));
        assert_eq!(parse_wire_date("next week"), None);
    }

    #[test]
    fn test_parse_date_expr_relative() {
        let today = d(2024, 3, 1);
        assert_eq!(parse_date_expr_from("today", today).unwrap(), today);
        assert_eq!(parse_date_expr_from("tomorrow", today).unwrap(), d(2024, 3, 2));
        assert_eq!(parse_date_expr_from("yesterday", today).unwrap(), d(2024, 2, 29));
        assert_eq!(parse_date_expr_from("+10d", today).unwrap(), d(2024, 3, 11));
        assert_eq!(parse_date_expr_from("-1d", today).unwrap(), d(2024, 2, 29));
        assert_eq!(parse_date_expr_from("2025-12-31", today).unwrap(), d(2025, 12, 31));
    }

    #[test]
    fn test_parse_date_expr_rejects_unknown() {
        let today = d(2024, 3, 1);
        assert!(parse_date_expr_from("someday", today).is_err());
        assert!(parse_date_expr_from("10d", today).is_err());
        assert!(parse_date_expr_from("+100000000d", today).is_err());
        assert!(parse_date_expr_from("-999999999999999d", today).is_err());
        assert!(parse_date_expr_from("2024-13-01", today).is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some(d(2024, 1, 5))), "2024-01-05");
        assert_eq!(format_date(None), "-");
    }
}
