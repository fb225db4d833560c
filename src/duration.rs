//! Elapsed-time strings
//!
//! Times are displayed as `H:MM:SS.CC` and read back from `S[.f]`,
//! `M:S[.f]` or `H:M:S[.f]`.

use std::time::Duration;
use thiserror::Error;

/// Error returned when a time string cannot be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    /// A numeric field is not a nonnegative integer
    #[error("invalid {field} field '{value}'")]
    InvalidField { field: &'static str, value: String },
    /// More than three `:`-separated fields
    #[error("expected at most 3 fields, found {0}")]
    TooManyFields(usize),
    /// The total does not fit in a millisecond count
    #[error("time '{0}' is too large")]
    Overflow(String),
}

/// Format a duration as `H:MM:SS.CC`
///
/// Hours are unbounded but padded to at least two digits.
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1000) % 60;
    let centis = (ms % 1000) / 10;

    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

/// Parse a time string into a duration
///
/// The length of the fractional part fixes its scale: one digit is tenths,
/// two are hundredths, three are milliseconds. Any other length reads as 0.
pub fn parse_duration(s: &str) -> Result<Duration, ParseDurationError> {
    let s = s.trim();
    let fields: Vec<&str> = s.split(':').collect();
    if fields.len() > 3 {
        return Err(ParseDurationError::TooManyFields(fields.len()));
    }

    let (last, leading) = match fields.split_last() {
        Some(split) => split,
        None => return Err(ParseDurationError::TooManyFields(0)),
    };

    let (seconds_str, fraction) = match last.split_once('.') {
        Some((sec, frac)) => (sec, Some(frac)),
        None => (*last, None),
    };

    let seconds = parse_field("seconds", seconds_str)?;
    let (hours, minutes) = match leading {
        [h, m] => (parse_field("hours", h)?, parse_field("minutes", m)?),
        [m] => (0, parse_field("minutes", m)?),
        _ => (0, 0),
    };

    let fraction_ms = match fraction {
        Some(frac) => parse_fraction(frac)?,
        None => 0,
    };

    let total_ms = hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .and_then(|m| m.checked_mul(60))
        .and_then(|m| m.checked_add(seconds))
        .and_then(|sec| sec.checked_mul(1000))
        .and_then(|ms| ms.checked_add(fraction_ms))
        .ok_or_else(|| ParseDurationError::Overflow(s.to_string()))?;
    Ok(Duration::from_millis(total_ms))
}

fn parse_field(field: &'static str, value: &str) -> Result<u64, ParseDurationError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ParseDurationError::InvalidField {
            field,
            value: value.to_string(),
        })
}

fn parse_fraction(frac: &str) -> Result<u64, ParseDurationError> {
    let scale = match frac.len() {
        1 => 100,
        2 => 10,
        3 => 1,
        _ => return Ok(0),
    };
    Ok(parse_field("fraction", frac)? * scale)
}
