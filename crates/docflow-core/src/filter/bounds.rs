//! Parsing and resolution of filter bounds.

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use crate::{Error, Result, TRACING_TARGET_FILTER};

/// Parses a size bound in mebibytes as typed by a user.
///
/// Blank input means "no bound" and is not an error. Anything that is not a
/// finite, non-negative number is rejected with an `InvalidInput` error; the
/// filter builder recovers from it by dropping the bound.
pub fn parse_size_bound(input: &str) -> Result<Option<f64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: f64 = trimmed.parse().map_err(|e| {
        Error::from_source(crate::ErrorKind::InvalidInput, e)
            .with_message(format!("'{trimmed}' is not a number"))
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_input()
            .with_message(format!("'{trimmed}' is not a valid size in MB")));
    }

    Ok(Some(value))
}

/// Parses a calendar date bound (`YYYY-MM-DD`); blank input means "no bound".
pub fn parse_date_bound(input: &str) -> Result<Option<Date>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed.parse::<Date>().map(Some).map_err(|e| {
        Error::from_source(crate::ErrorKind::InvalidInput, e)
            .with_message(format!("'{trimmed}' is not a calendar date"))
    })
}

/// First instant of `date` in `tz`.
pub(crate) fn start_of_day(date: Date, tz: &TimeZone) -> Option<Timestamp> {
    match date.to_zoned(tz.clone()) {
        Ok(zoned) => Some(zoned.timestamp()),
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET_FILTER,
                %date,
                %error,
                "ignoring unresolvable lower date bound"
            );
            None
        }
    }
}

/// Last millisecond of `date` in `tz` (23:59:59.999).
pub(crate) fn end_of_day(date: Date, tz: &TimeZone) -> Option<Timestamp> {
    match date.at(23, 59, 59, 999_000_000).to_zoned(tz.clone()) {
        Ok(zoned) => Some(zoned.timestamp()),
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET_FILTER,
                %date,
                %error,
                "ignoring unresolvable upper date bound"
            );
            None
        }
    }
}
