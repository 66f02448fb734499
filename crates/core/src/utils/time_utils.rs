use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};

use crate::constants::QUOTATION_NUMBER_PREFIX;

/// Naive layouts accepted for date-times without an offset.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Source of the current local time.
///
/// Quotation numbering and `created_at` stamps read the clock through this
/// trait so they can be pinned in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

fn format_naive(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Parses an ISO-8601 style date-time and re-serialises it canonically.
///
/// Offsets (`Z`, `+08:00`) are preserved in RFC 3339 form; naive values are
/// written as `YYYY-MM-DDTHH:MM:SS[.fff]`; a bare date means midnight.
/// Feeding the output back in yields the same string.
pub fn normalize_iso_datetime(value: &str) -> Result<String, chrono::ParseError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(format_naive(dt));
        }
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")?;
    Ok(format_naive(date.and_time(NaiveTime::MIN)))
}

/// Returns true when `value` is a date-time `normalize_iso_datetime` accepts.
pub fn is_iso_datetime(value: &str) -> bool {
    normalize_iso_datetime(value).is_ok()
}

/// Formats a creation stamp with fixed-width microseconds so stored values
/// compare correctly as strings.
pub fn format_created_at(now: DateTime<Local>) -> String {
    now.naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Builds the human-readable quotation number for a numbering attempt.
///
/// `Q` + local `YYYYMMDDHHMMSS` + three digits taken from the Unix
/// milliseconds, shifted by `attempt` so a retry never reuses a number.
pub fn quotation_number(now: DateTime<Local>, attempt: u32) -> String {
    let disambiguator = (now.timestamp_millis() + i64::from(attempt)).rem_euclid(1000);
    format!(
        "{}{}{:03}",
        QUOTATION_NUMBER_PREFIX,
        now.format("%Y%m%d%H%M%S"),
        disambiguator
    )
}
