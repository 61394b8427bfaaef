//! Ephemeris port and analytic lunar/solar ephemeris.
//!
//! This crate provides:
//! - The [`EphemerisPort`] trait the almanac engine searches through
//! - Shared [`Location`], [`Body`], [`EventKind`], and [`SearchOutcome`] types
//! - [`MeeusEphemeris`], a stateless port implementation using Meeus'
//!   lunar and solar theories (via the `astro` crate)

pub mod error;
pub mod meeus;
pub mod meeus_types;
pub mod port;
pub mod position;
pub mod types;

pub use error::EphemError;
pub use meeus::MeeusEphemeris;
pub use meeus_types::MeeusConfig;
pub use port::EphemerisPort;
pub use position::{elongation_deg, illuminated_fraction, normalize_to_pm180};
pub use types::{Body, EventKind, Location, SearchOutcome};
