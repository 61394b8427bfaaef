//! Error types for time conversions and local day windows.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors from Julian-date conversion or timezone resolution.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Timezone identifier is not in the tz database.
    #[error("unknown timezone identifier: {0}")]
    UnknownTimezone(String),
    /// No valid local instant exists near midnight of the date.
    #[error("no valid local midnight for {date} in {tz}")]
    NoLocalMidnight { date: NaiveDate, tz: String },
    /// Julian Date cannot be represented as a UTC instant.
    #[error("Julian Date {0} is outside the representable UTC range")]
    JdOutOfRange(f64),
    /// Calendar arithmetic overflowed.
    #[error("date arithmetic out of range: {0}")]
    DateOutOfRange(&'static str),
}
