//! ISO 8601 date and date-time parsing for query filters.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// `YYYY-MM-DD` optionally followed by `THH:MM[:SS[.fraction]]` and a `Z` or
/// numeric offset.
static ISO_8601_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{2})-(\d{2})(?:T(\d{2}):(\d{2})(?::(\d{2})(?:\.(\d+))?)?(Z|[+-]\d{2}:?\d{2})?)?$",
    )
    .unwrap()
});

/// Parses an ISO 8601 date or date-time into a UTC timestamp.
///
/// A bare date means midnight UTC and a date-time without an offset is read
/// as UTC. Returns `None` when the input does not match the pattern or names
/// an impossible calendar date or time.
pub fn validate_date_time(raw: &str) -> Option<DateTime<Utc>> {
    let caps = ISO_8601_REGEX.captures(raw.trim())?;

    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(2)?, number(3)?)?;

    let time = match number(4) {
        Some(hour) => {
            let nanos = caps.get(7).map(|m| fraction_to_nanos(m.as_str())).unwrap_or(0);
            NaiveTime::from_hms_nano_opt(hour, number(5)?, number(6).unwrap_or(0), nanos)?
        }
        None => NaiveTime::MIN,
    };

    let offset = match caps.get(8).map(|m| m.as_str()) {
        None | Some("Z") => FixedOffset::east_opt(0)?,
        Some(raw_offset) => parse_offset(raw_offset)?,
    };

    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Converts fractional-second digits to nanoseconds, ignoring digits beyond
/// nanosecond precision.
fn fraction_to_nanos(digits: &str) -> u32 {
    let truncated: String = digits.chars().take(9).collect();
    let scale = 10u32.pow(9 - truncated.len() as u32);
    truncated.parse::<u32>().map(|n| n * scale).unwrap_or(0)
}

/// Parses `+HH:MM`, `-HH:MM`, `+HHMM` or `-HHMM`.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;

    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
