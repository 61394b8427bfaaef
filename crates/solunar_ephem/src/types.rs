//! Location, body, event-kind, and search-outcome types shared by every
//! ephemeris implementation.

use chrono::{DateTime, Utc};

use crate::error::EphemError;

/// Geographic observer location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Geodetic latitude in degrees, north positive. Range: [-90, 90].
    pub latitude_deg: f64,
    /// Geodetic longitude in degrees, east positive. Range: [-180, 180].
    pub longitude_deg: f64,
}

impl Location {
    /// Create a validated location.
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, EphemError> {
        if !latitude_deg.is_finite() || !longitude_deg.is_finite() {
            return Err(EphemError::InvalidLocation("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(EphemError::InvalidLocation("latitude must be in [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(EphemError::InvalidLocation(
                "longitude must be in [-180, 180]",
            ));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    /// Latitude in radians.
    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    /// Longitude in radians (east positive).
    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}

/// Bodies the ephemeris can search events for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Moon,
    /// Only used for sunrise/sunset pass-through.
    Sun,
}

/// Kinds of horizon and meridian events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Body crosses the local meridian overhead.
    UpperTransit,
    /// Body crosses the meridian on the far side of the Earth.
    LowerTransit,
    /// Upper limb appears above the horizon.
    Rise,
    /// Upper limb disappears below the horizon.
    Set,
}

impl EventKind {
    /// All four kinds, transits first.
    pub const ALL: [EventKind; 4] = [
        EventKind::UpperTransit,
        EventKind::LowerTransit,
        EventKind::Rise,
        EventKind::Set,
    ];

    /// Transit-class kinds (major periods).
    pub const TRANSITS: [EventKind; 2] = [EventKind::UpperTransit, EventKind::LowerTransit];

    /// Rise/set-class kinds (minor periods).
    pub const HORIZON: [EventKind; 2] = [EventKind::Rise, EventKind::Set];

    /// Whether this is a meridian transit (major period).
    pub fn is_transit(self) -> bool {
        matches!(self, Self::UpperTransit | Self::LowerTransit)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::UpperTransit => "upper transit",
            Self::LowerTransit => "lower transit",
            Self::Rise => "rise",
            Self::Set => "set",
        }
    }
}

/// Result of searching forward for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Event found at this instant.
    Found(DateTime<Utc>),
    /// The body never reaches the event within the search horizon
    /// (circumpolar or permanently below the horizon).
    NeverOccurs,
    /// The search ran out of its iteration budget first.
    Exhausted,
}

impl SearchOutcome {
    /// The instant, if found.
    pub fn instant(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Found(t) => Some(t),
            Self::NeverOccurs | Self::Exhausted => None,
        }
    }
}
