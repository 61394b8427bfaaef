//! Solunar almanac engine: event search, day binning, moon age, and
//! multi-day assembly.
//!
//! This crate provides:
//! - [`search_events`]: ordered moon transit and rise/set events over a window
//! - [`bin_day`]: major (transit) and minor (rise/set) periods of a local day
//! - [`phase_and_age`]: illumination and epoch-anchored moon age
//! - [`compute_almanac`] / [`compute_almanac_parallel`]: records for N days
//!
//! Everything here talks to the sky through
//! [`EphemerisPort`](solunar_ephem::EphemerisPort).

pub mod almanac;
pub mod almanac_types;
pub mod binner;
pub mod error;
pub mod event_types;
pub mod events;
pub mod phase_age;

pub use almanac::{
    SunTimes, assemble_record, compute_almanac, compute_almanac_parallel,
    compute_almanac_with_epoch, compute_day, sun_times,
};
pub use almanac_types::{
    Almanac, AlmanacConfig, DaySolunarRecord, MAX_HORIZON_DAYS, UTC_FORMAT, format_utc,
};
pub use binner::{DayBins, PERIODS_PER_CLASS, bin_day, bin_window, select_periods};
pub use error::AlmanacError;
pub use event_types::{Event, EventStream, MIN_MARGIN_HOURS, SearchConfig, SearchCursor};
pub use events::search_events;
pub use phase_age::{
    DayRating, EpochReference, MoonPhase, PhaseName, SYNODIC_PERIOD_DAYS, moon_age_days,
    phase_and_age, round1,
};
