//! RFC 3339 parsing and formatting for millisecond timestamps.
//!
//! Timestamps are formatted in UTC (`Z`) with a millisecond fraction that is
//! omitted when zero. Parsing accepts `T` or space separators, any number of
//! fractional digits (truncated to milliseconds) and `Z`/`+HH:MM`/`-HH:MM`
//! offsets. Years are limited to four digits.

const MILLISECONDS_PER_SECOND: i64 = 1_000;
const MILLISECONDS_PER_MINUTE: i64 = 60 * MILLISECONDS_PER_SECOND;
const MILLISECONDS_PER_HOUR: i64 = 60 * MILLISECONDS_PER_MINUTE;
const MILLISECONDS_PER_DAY: i64 = 24 * MILLISECONDS_PER_HOUR;

/// 0000-01-01T00:00:00Z, the earliest instant with a four-digit year.
pub const RFC3339_MIN_MILLIS: i64 = -62_167_219_200_000;

/// 9999-12-31T23:59:59.999Z, the latest instant with a four-digit year.
pub const RFC3339_MAX_MILLIS: i64 = 253_402_300_799_999;

/// Error type for RFC 3339 parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    pub message: String,
}

impl DateTimeParseError {
    fn invalid(what: &str, input: &str) -> Self {
        Self {
            message: format!("Invalid {} in datetime: {}", what, input),
        }
    }
}

impl std::fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeParseError {}

/// Parses a timezone offset string (Z, +HH:MM, -HH:MM) and returns offset in minutes.
fn parse_timezone_offset(offset: &str) -> Result<i64, DateTimeParseError> {
    if offset == "Z" || offset == "z" {
        return Ok(0);
    }

    let bytes = offset.as_bytes();
    if bytes.len() != 6 || bytes[3] != b':' {
        return Err(DateTimeParseError::invalid("timezone offset", offset));
    }

    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(DateTimeParseError::invalid("timezone offset", offset)),
    };

    let hours: i64 = parse_digits(&offset[1..3])
        .ok_or_else(|| DateTimeParseError::invalid("timezone offset", offset))?;
    let minutes: i64 = parse_digits(&offset[4..6])
        .ok_or_else(|| DateTimeParseError::invalid("timezone offset", offset))?;

    // 24:00 is the widest offset allowed
    if hours > 24 || (hours == 24 && minutes != 0) || minutes > 59 {
        return Err(DateTimeParseError::invalid("timezone offset", offset));
    }

    Ok(sign * (hours * 60 + minutes))
}

/// Parses an ASCII-digit-only field; rejects signs and whitespace.
fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parses fractional seconds and returns milliseconds (extra digits are truncated).
fn parse_fractional_millis(frac: &str) -> i64 {
    let mut millis = 0;
    for (i, b) in frac.bytes().take(3).enumerate() {
        millis += i64::from(b - b'0') * 10i64.pow(2 - i as u32);
    }
    millis
}

/// Formats milliseconds as fractional seconds, omitting them if zero.
fn format_fractional_millis(ms: i64) -> String {
    if ms == 0 {
        return String::new();
    }
    let s = format!("{:03}", ms);
    format!(".{}", s.trim_end_matches('0'))
}

/// Returns true if the given year is a leap year.
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Returns the number of days in a given month (1-indexed).
fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Calculates days since Unix epoch for a given civil date (Howard Hinnant).
fn date_to_days(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 { month + 9 } else { month - 3 };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let doy = (153 * m + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;

    era * 146_097 + doe - 719_468
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };

    (if m <= 2 { y + 1 } else { y }, m, d)
}

/// Parses an RFC 3339 datetime and returns milliseconds since the Unix epoch (UTC).
pub fn parse_timestamp_rfc3339(input: &str) -> Result<i64, DateTimeParseError> {
    let bytes = input.as_bytes();
    // YYYY-MM-DDTHH:MM:SS
    if bytes.len() < 19 || !input.is_ascii() {
        return Err(DateTimeParseError {
            message: format!("Invalid RFC 3339 datetime: {}", input),
        });
    }
    if bytes[4] != b'-' || bytes[7] != b'-' || bytes[13] != b':' || bytes[16] != b':' {
        return Err(DateTimeParseError {
            message: format!("Invalid RFC 3339 datetime: {}", input),
        });
    }
    if !matches!(bytes[10], b'T' | b't' | b' ') {
        return Err(DateTimeParseError {
            message: format!("Invalid RFC 3339 datetime: {}", input),
        });
    }

    let year = parse_digits(&input[0..4]).ok_or_else(|| DateTimeParseError::invalid("year", input))?;
    let month = parse_digits(&input[5..7]).ok_or_else(|| DateTimeParseError::invalid("month", input))?;
    let day = parse_digits(&input[8..10]).ok_or_else(|| DateTimeParseError::invalid("day", input))?;
    let hours = parse_digits(&input[11..13]).ok_or_else(|| DateTimeParseError::invalid("hours", input))?;
    let minutes = parse_digits(&input[14..16]).ok_or_else(|| DateTimeParseError::invalid("minutes", input))?;
    let seconds = parse_digits(&input[17..19]).ok_or_else(|| DateTimeParseError::invalid("seconds", input))?;

    if !(1..=12).contains(&month) {
        return Err(DateTimeParseError::invalid("month", input));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(DateTimeParseError::invalid("day", input));
    }
    if hours > 23 {
        return Err(DateTimeParseError::invalid("hours", input));
    }
    if minutes > 59 {
        return Err(DateTimeParseError::invalid("minutes", input));
    }
    if seconds > 59 {
        return Err(DateTimeParseError::invalid("seconds", input));
    }

    let rest = &input[19..];
    let (millis, offset_str) = match rest.strip_prefix('.') {
        Some(frac_and_tz) => {
            let frac_end = frac_and_tz
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(frac_and_tz.len());
            if frac_end == 0 {
                return Err(DateTimeParseError::invalid("fractional seconds", input));
            }
            (
                parse_fractional_millis(&frac_and_tz[..frac_end]),
                &frac_and_tz[frac_end..],
            )
        }
        None => (0, rest),
    };

    let offset_min = if offset_str.is_empty() {
        0
    } else {
        parse_timezone_offset(offset_str)?
    };

    let local = date_to_days(year, month, day) * MILLISECONDS_PER_DAY
        + hours * MILLISECONDS_PER_HOUR
        + minutes * MILLISECONDS_PER_MINUTE
        + seconds * MILLISECONDS_PER_SECOND
        + millis;

    // local time = UTC + offset
    Ok(local - offset_min * MILLISECONDS_PER_MINUTE)
}

/// Formats milliseconds since the Unix epoch as an RFC 3339 UTC datetime.
///
/// Only instants within [`RFC3339_MIN_MILLIS`]..=[`RFC3339_MAX_MILLIS`] have a
/// valid form; callers check the range first.
pub fn format_timestamp_rfc3339(epoch_millis: i64) -> String {
    let days = epoch_millis.div_euclid(MILLISECONDS_PER_DAY);
    let time_ms = epoch_millis.rem_euclid(MILLISECONDS_PER_DAY);

    let (year, month, day) = days_to_date(days);

    let hours = time_ms / MILLISECONDS_PER_HOUR;
    let minutes = (time_ms % MILLISECONDS_PER_HOUR) / MILLISECONDS_PER_MINUTE;
    let seconds = (time_ms % MILLISECONDS_PER_MINUTE) / MILLISECONDS_PER_SECOND;
    let millis = time_ms % MILLISECONDS_PER_SECOND;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}Z",
        year,
        month,
        day,
        hours,
        minutes,
        seconds,
        format_fractional_millis(millis)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        assert_eq!(parse_timestamp_rfc3339("1970-01-01T00:00:00Z").unwrap(), 0);
        assert_eq!(parse_timestamp_rfc3339("2021-01-01T00:00:00Z").unwrap(), 1609459200000);
        assert_eq!(parse_timestamp_rfc3339("2024-03-15T14:30:00.123Z").unwrap(), 1710513000123);
        assert_eq!(parse_timestamp_rfc3339("2024-03-15 14:30:00").unwrap(), 1710513000000);
    }

    #[test]
    fn test_parse_truncates_extra_fraction_digits() {
        assert_eq!(parse_timestamp_rfc3339("2024-03-15T14:30:00.123456Z").unwrap(), 1710513000123);
        assert_eq!(parse_timestamp_rfc3339("2024-03-15T14:30:00.5Z").unwrap(), 1710513000500);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_timestamp_rfc3339(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_timestamp_rfc3339(1609459200000), "2021-01-01T00:00:00Z");
        assert_eq!(format_timestamp_rfc3339(1710513000123), "2024-03-15T14:30:00.123Z");
        assert_eq!(format_timestamp_rfc3339(1710513000500), "2024-03-15T14:30:00.5Z");
    }

    #[test]
    fn test_roundtrip() {
        let datetimes = [
            "1970-01-01T00:00:00Z",
            "2000-02-29T12:00:00Z",
            "2024-03-15T14:30:00.5Z",
            "2024-12-31T23:59:59.999Z",
            "1969-12-31T23:59:59Z",
        ];
        for datetime in datetimes {
            let millis = parse_timestamp_rfc3339(datetime).unwrap();
            assert_eq!(format_timestamp_rfc3339(millis), datetime, "Roundtrip failed for {}", datetime);
        }
    }

    #[test]
    fn test_offset_is_normalized_to_utc() {
        let with_offset = parse_timestamp_rfc3339("2024-03-15T14:30:00+05:30").unwrap();
        let utc = parse_timestamp_rfc3339("2024-03-15T09:00:00Z").unwrap();
        assert_eq!(with_offset, utc);
        assert_eq!(format_timestamp_rfc3339(with_offset), "2024-03-15T09:00:00Z");
    }

    #[test]
    fn test_negative_epoch() {
        assert_eq!(parse_timestamp_rfc3339("1969-12-31T23:59:59.999Z").unwrap(), -1);
        assert_eq!(format_timestamp_rfc3339(-1), "1969-12-31T23:59:59.999Z");
    }

    #[test]
    fn test_invalid_datetimes() {
        assert!(parse_timestamp_rfc3339("2024-13-01T00:00:00Z").is_err()); // invalid month
        assert!(parse_timestamp_rfc3339("2023-02-29T00:00:00Z").is_err()); // not a leap year
        assert!(parse_timestamp_rfc3339("2024-03-15T24:00:00Z").is_err()); // invalid hour
        assert!(parse_timestamp_rfc3339("2024-03-15T14:30:00.Z").is_err()); // empty fraction
        assert!(parse_timestamp_rfc3339("2024-03-15T14:30:00+25:00").is_err());
        assert!(parse_timestamp_rfc3339("2024-03-15").is_err());
        assert!(parse_timestamp_rfc3339("not a datetime at all").is_err());
        assert!(parse_timestamp_rfc3339("+024-03-15T14:30:00Z").is_err());
    }

    #[test]
    fn test_timezone_offset_edge_cases() {
        assert_eq!(parse_timezone_offset("+24:00"), Ok(1440));
        assert_eq!(parse_timezone_offset("-05:30"), Ok(-330));
        assert!(parse_timezone_offset("+24:01").is_err());
        assert!(parse_timezone_offset("05:30").is_err());
    }
}
