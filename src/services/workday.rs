//! Day-boundary math shared by the clock engine and leave reconciliation.
//!
//! All instants are handled in UTC; a day key is the UTC calendar day of
//! an instant. Day-key equality is calendar equality, not instant
//! equality, so callers must stay in one timezone domain — here that
//! domain is UTC end to end.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::database::models::DayInput;
use crate::error::AppError;

/// The calendar day an instant falls on.
pub fn day_key(at: NaiveDateTime) -> NaiveDate {
    at.date()
}

/// Normalizes a client-supplied value to a calendar day. Accepts epoch
/// milliseconds, an ISO-8601 datetime (with or without offset), or a
/// plain `YYYY-MM-DD` date. Anything else is an invalid-date error, never
/// a silently corrected value.
pub fn normalize(input: &DayInput) -> Result<NaiveDate, AppError> {
    match input {
        DayInput::Millis(ms) => Utc
            .timestamp_millis_opt(*ms)
            .single()
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| AppError::invalid_date(format!("epoch out of range: {}", ms))),
        DayInput::Text(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.with_timezone(&Utc).naive_utc().date());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Ok(dt.date());
            }
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Ok(d);
            }
            Err(AppError::invalid_date(format!("unparseable date: {}", s)))
        }
    }
}

/// Inclusive, ordered day sequence from `start` to `end`. An inverted
/// range is a contract violation: callers rely on at least one element
/// for a single-day leave, so this never returns an empty sequence.
pub fn day_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, AppError> {
    if end < start {
        return Err(AppError::InvalidDateRange(format!(
            "end date {} precedes start date {}",
            end, start
        )));
    }

    Ok(start.iter_days().take_while(|day| *day <= end).collect())
}

/// Strictly after the cutoff on the clock-in's own day counts as late;
/// exactly on the cutoff does not.
pub fn derive_lateness(clock_in: NaiveDateTime, late_after: NaiveTime) -> bool {
    clock_in.time() > late_after
}

/// Hours between clock-in and clock-out, rounded to two decimals. A
/// clock-out before the clock-in is a caller clock error and is rejected
/// rather than clamped.
pub fn derive_working_hours(
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
) -> Result<f64, AppError> {
    if clock_out < clock_in {
        return Err(AppError::invalid_date(format!(
            "clock-out {} precedes clock-in {}",
            clock_out, clock_in
        )));
    }

    let seconds = (clock_out - clock_in).num_seconds() as f64;
    Ok(round2(seconds / 3600.0))
}

pub fn round2(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// First and last day of a calendar month, for attendance month filters.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::invalid_date(format!("invalid month: {}-{}", year, month)))?;

    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::invalid_date(format!("invalid month: {}-{}", year, month)))?;

    let last = next_month_first
        .pred_opt()
        .ok_or_else(|| AppError::invalid_date(format!("invalid month: {}-{}", year, month)))?;

    Ok((first, last))
}

/// Resolves the optional month/year listing filter to an inclusive date
/// window. A month without a year (or vice versa) filters nothing, the
/// same as no filter at all.
pub fn month_filter(
    month: Option<u32>,
    year: Option<i32>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), AppError> {
    match (month, year) {
        (Some(m), Some(y)) => {
            let (first, last) = month_bounds(y, m)?;
            Ok((Some(first), Some(last)))
        }
        _ => Ok((None, None)),
    }
}
