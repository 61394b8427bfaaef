//! The ephemeris port consumed by the search engine.

use chrono::{DateTime, Utc};

use crate::error::EphemError;
use crate::types::{Body, EventKind, Location, SearchOutcome};

/// Source of lunar (and solar) events and phase.
///
/// Implementations must be pure with respect to their inputs: the same
/// arguments always give the same answer. Nothing here carries a search
/// cursor; callers pass the instant to search from.
pub trait EphemerisPort {
    /// Illuminated fraction of the lunar disk in [0, 1] at `at`.
    fn phase_fraction(&self, location: &Location, at: DateTime<Utc>) -> Result<f64, EphemError>;

    /// Next event of `kind` for `body` strictly after `after`.
    ///
    /// Returns [`SearchOutcome::NeverOccurs`] when the body does not reach
    /// the event within the implementation's search horizon.
    fn next_event(
        &self,
        location: &Location,
        body: Body,
        kind: EventKind,
        after: DateTime<Utc>,
    ) -> Result<SearchOutcome, EphemError>;

    /// Most recent new moon strictly before `before`.
    fn previous_new_moon(&self, before: DateTime<Utc>) -> Result<DateTime<Utc>, EphemError>;
}
