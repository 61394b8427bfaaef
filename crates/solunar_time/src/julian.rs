//! Julian Date ↔ UTC conversions.
//!
//! The ephemeris works in Julian Dates; everything above it works in
//! `DateTime<Utc>`. UT1 − UTC (< 0.9 s) is ignored, so a UTC Julian Date is
//! used directly as UT for sidereal time.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::TimeError;

/// Julian Date of the Unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Date of J2000.0 (2000-01-01T12:00:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Convert a UTC instant to a Julian Date (UTC scale).
pub fn utc_to_jd(t: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_JD + t.timestamp_millis() as f64 / MILLIS_PER_DAY
}

/// Convert a Julian Date (UTC scale) to a UTC instant, rounded to the millisecond.
pub fn jd_to_utc(jd: f64) -> Result<DateTime<Utc>, TimeError> {
    if !jd.is_finite() {
        return Err(TimeError::JdOutOfRange(jd));
    }
    let millis = ((jd - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return Err(TimeError::JdOutOfRange(jd));
    }
    DateTime::from_timestamp_millis(millis as i64).ok_or(TimeError::JdOutOfRange(jd))
}

/// Signed elapsed time from `from` to `to` in fractional days.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Offset an instant by a fractional number of days (millisecond resolution).
pub fn add_days(t: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    t + TimeDelta::milliseconds((days * MILLIS_PER_DAY).round() as i64)
}
