//! Date parsing for filename date ranges and dated attributes.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Precision of a compact all-digit date token, determined by the output
/// frequency of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateResolution {
    Year,
    Month,
    Day,
    Minute,
    Second,
}

impl DateResolution {
    /// Number of digits in a compact token of this resolution.
    pub const fn width(self) -> usize {
        match self {
            Self::Year => 4,
            Self::Month => 6,
            Self::Day => 8,
            Self::Minute => 12,
            Self::Second => 14,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("unsupported frequency {0}")]
    UnsupportedFrequency(String),
    #[error("{reason}")]
    Malformed { range: String, reason: String },
}

/// Map an output frequency onto the resolution of its filename date range.
///
/// `fx` (time-invariant fields) carries no date range at all and maps to
/// `None`; a frequency outside the known table is an error.
pub fn resolution_for_frequency(
    frequency: &str,
) -> Result<Option<DateResolution>, DateRangeError> {
    let resolution = match frequency {
        "yr" | "yrPt" | "dec" => DateResolution::Year,
        "mon" | "monC" | "monPt" => DateResolution::Month,
        "day" => DateResolution::Day,
        "6hr" | "6hrPt" | "3hr" | "3hrPt" | "1hr" | "1hrCM" | "1hrPt" => DateResolution::Minute,
        "subhr" | "subhrPt" => DateResolution::Second,
        "fx" => return Ok(None),
        other => return Err(DateRangeError::UnsupportedFrequency(other.to_string())),
    };
    Ok(Some(resolution))
}

/// Parse a compact all-digit token (`1850`, `185001`, `18500101`, ...) at the
/// given resolution. Components below the resolution default to the start of
/// the period.
pub fn parse_compact(token: &str, resolution: DateResolution) -> Option<NaiveDateTime> {
    let width = resolution.width();
    if token.len() != width || !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        token.get(range).and_then(|part| part.parse().ok())
    };

    let year = digits(0..4)? as i32;
    let month = if width >= 6 { digits(4..6)? } else { 1 };
    let day = if width >= 8 { digits(6..8)? } else { 1 };
    let hour = if width >= 12 { digits(8..10)? } else { 0 };
    let minute = if width >= 12 { digits(10..12)? } else { 0 };
    let second = if width >= 14 { digits(12..14)? } else { 0 };

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Parse a filename date range (`<start>-<end>`) against the declared
/// frequency. The end point must be strictly after the start point.
///
/// Returns `Ok(None)` for `fx`, where no range is expected.
pub fn parse_date_range(
    range: &str,
    frequency: &str,
) -> Result<Option<(NaiveDateTime, NaiveDateTime)>, DateRangeError> {
    let Some(resolution) = resolution_for_frequency(frequency)? else {
        return Ok(None);
    };
    let malformed = |reason: &str| DateRangeError::Malformed {
        range: range.to_string(),
        reason: reason.to_string(),
    };

    let (start_token, end_token) = range
        .split_once('-')
        .ok_or_else(|| malformed("expected <start>-<end>"))?;
    let start =
        parse_compact(start_token, resolution).ok_or_else(|| malformed("unparseable start date"))?;
    let end =
        parse_compact(end_token, resolution).ok_or_else(|| malformed("unparseable end date"))?;
    if end <= start {
        return Err(malformed("end date is not after start date"));
    }
    Ok(Some((start, end)))
}

/// Parse a date expression from a time-units string, accepting the partial
/// and ambiguous forms reference dates appear in: year-only (`3313`),
/// year-month, and day/month/year in either order (`01-01-1850`).
pub fn parse_loose_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split('-').collect();
    match parts.as_slice() {
        [year] => build_date(year, "1", "1"),
        [a, b] => build_date(a, b, "1").or_else(|| build_date(b, a, "1")),
        [a, b, c] => build_date(a, b, c)
            .or_else(|| build_date(c, b, a))
            .or_else(|| build_date(c, a, b)),
        _ => None,
    }
}

fn build_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    if year.is_empty() || year.len() > 4 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Strict parse of a date/time string against a strftime template; any
/// failure yields `None`.
pub fn parse_template(text: &str, template: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, template).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_table_is_exhaustive() {
        for frequency in ["yr", "yrPt", "dec"] {
            assert_eq!(
                resolution_for_frequency(frequency),
                Ok(Some(DateResolution::Year))
            );
        }
        for frequency in ["mon", "monC", "monPt"] {
            assert_eq!(
                resolution_for_frequency(frequency),
                Ok(Some(DateResolution::Month))
            );
        }
        assert_eq!(resolution_for_frequency("day"), Ok(Some(DateResolution::Day)));
        for frequency in ["6hr", "6hrPt", "3hr", "3hrPt", "1hr", "1hrCM", "1hrPt"] {
            assert_eq!(
                resolution_for_frequency(frequency),
                Ok(Some(DateResolution::Minute))
            );
        }
        for frequency in ["subhr", "subhrPt"] {
            assert_eq!(
                resolution_for_frequency(frequency),
                Ok(Some(DateResolution::Second))
            );
        }
        assert_eq!(resolution_for_frequency("fx"), Ok(None));
        assert_eq!(
            resolution_for_frequency("weekly"),
            Err(DateRangeError::UnsupportedFrequency("weekly".to_string()))
        );
    }

    #[test]
    fn compact_parsing_defaults_missing_components() {
        let start = parse_compact("185001", DateResolution::Month).expect("monthly token");
        assert_eq!(start.to_string(), "1850-01-01 00:00:00");
        let point = parse_compact("201601021530", DateResolution::Minute).expect("minute token");
        assert_eq!(point.to_string(), "2016-01-02 15:30:00");
    }

    #[test]
    fn compact_parsing_rejects_wrong_width_and_bad_components() {
        assert!(parse_compact("1850", DateResolution::Month).is_none());
        assert!(parse_compact("185013", DateResolution::Month).is_none());
        assert!(parse_compact("1850a1", DateResolution::Month).is_none());
    }

    #[test]
    fn monthly_range_parses_and_orders() {
        let (start, end) = parse_date_range("185001-185912", "mon")
            .expect("valid range")
            .expect("range present");
        assert_eq!(start.date().to_string(), "1850-01-01");
        assert_eq!(end.date().to_string(), "1859-12-01");
    }

    #[test]
    fn inverted_range_is_malformed() {
        let err = parse_date_range("185912-185001", "mon").expect_err("inverted range");
        assert!(matches!(err, DateRangeError::Malformed { .. }));
    }

    #[test]
    fn fixed_frequency_expects_no_range() {
        assert_eq!(parse_date_range("185001-185912", "fx"), Ok(None));
    }

    #[test]
    fn loose_dates() {
        assert_eq!(
            parse_loose_date("3313"),
            NaiveDate::from_ymd_opt(3313, 1, 1)
        );
        assert_eq!(
            parse_loose_date("01-01-1850"),
            NaiveDate::from_ymd_opt(1850, 1, 1)
        );
        assert_eq!(
            parse_loose_date("1850-02"),
            NaiveDate::from_ymd_opt(1850, 2, 1)
        );
        assert_eq!(parse_loose_date(""), None);
        assert_eq!(parse_loose_date("-"), None);
    }

    #[test]
    fn template_parsing_is_strict() {
        assert!(parse_template("2019-03-21T10:05:02Z", "%Y-%m-%dT%H:%M:%SZ").is_some());
        assert!(parse_template("2019-03-21 10:05:02", "%Y-%m-%dT%H:%M:%SZ").is_none());
        assert!(parse_template("2019-13-21T10:05:02Z", "%Y-%m-%dT%H:%M:%SZ").is_none());
    }
}
