//! Time handling for the solunar almanac.
//!
//! This crate provides:
//! - Julian Date ↔ UTC conversions used by the ephemeris
//! - [`LocalDayWindow`], the DST-aware UTC interval of a local calendar day
//! - Timezone parsing and "today in zone" helpers

pub mod day_window;
pub mod error;
pub mod julian;

pub use day_window::{
    DAY_WINDOW_HOURS, LocalDayWindow, local_midnight_utc, parse_timezone, today_in,
};
pub use error::TimeError;
pub use julian::{
    J2000_JD, SECONDS_PER_DAY, UNIX_EPOCH_JD, add_days, days_between, jd_to_utc, utc_to_jd,
};
