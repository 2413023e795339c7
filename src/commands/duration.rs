//! Human duration strings such as `10m`, `1d12h` or `1h 30m`.

use chrono::TimeDelta;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("duration is empty")]
    Empty,
    #[error("number {0:?} has no unit (use s, m, h, d or w)")]
    MissingUnit(String),
    #[error("unknown unit {0:?} (use s, m, h, d or w)")]
    UnknownUnit(String),
    #[error("duration is too long")]
    Overflow,
}

/// Parse one or more `<integer><unit>` components.
///
/// Units: `s`, `m`, `h`, `d`, `w`. Whitespace between components is ignored.
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total = TimeDelta::zero();
    let mut chars = input.chars().filter(|c| !c.is_whitespace()).peekable();

    while chars.peek().is_some() {
        let mut digits = String::new();
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            digits.push(c);
        }
        let mut unit = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_ascii_digit()) {
            unit.push(c);
        }

        if digits.is_empty() {
            return Err(DurationError::UnknownUnit(unit));
        }
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(digits));
        }

        let amount: i64 = digits.parse().map_err(|_| DurationError::Overflow)?;
        let component = match unit.as_str() {
            "s" => TimeDelta::try_seconds(amount),
            "m" => TimeDelta::try_minutes(amount),
            "h" => TimeDelta::try_hours(amount),
            "d" => TimeDelta::try_days(amount),
            "w" => TimeDelta::try_weeks(amount),
            _ => return Err(DurationError::UnknownUnit(unit)),
        }
        .ok_or(DurationError::Overflow)?;

        total = total
            .checked_add(&component)
            .ok_or(DurationError::Overflow)?;
    }

    Ok(total)
}

/// Render a duration compactly, e.g. `1d 12h`.
pub fn format_duration(duration: TimeDelta) -> String {
    let mut secs = duration.num_seconds().max(0);
    if secs == 0 {
        return "0s".to_string();
    }

    let mut parts = Vec::new();
    for (unit, size) in [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)] {
        if secs >= size {
            parts.push(format!("{}{unit}", secs / size));
            secs %= size;
        }
    }
    parts.join(" ")
}
