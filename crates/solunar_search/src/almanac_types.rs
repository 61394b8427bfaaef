//! Per-day almanac record, the collection type, and run configuration.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use solunar_ephem::Location;

use crate::error::AlmanacError;
use crate::event_types::SearchConfig;
use crate::phase_age::{DayRating, PhaseName};

/// Format of every `*_utc` field in serialized records.
pub const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Longest horizon a single run may request.
pub const MAX_HORIZON_DAYS: u32 = 366;

/// Format an instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_utc(t: DateTime<Utc>) -> String {
    t.format(UTC_FORMAT).to_string()
}

fn serialize_utc<S>(t: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match t {
        Some(t) => serializer.collect_str(&t.format(UTC_FORMAT)),
        None => serializer.serialize_none(),
    }
}

/// Solunar data for one local calendar day.
///
/// Absent events serialize as `null`; no field is ever omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySolunarRecord {
    /// Local date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(serialize_with = "serialize_utc")]
    pub major_1_utc: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_utc")]
    pub major_2_utc: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_utc")]
    pub minor_1_utc: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_utc")]
    pub minor_2_utc: Option<DateTime<Utc>>,
    /// Illuminated percentage at local midnight, one decimal.
    pub moon_illum: f64,
    /// Days since the epoch new moon at local midnight, one decimal.
    pub moon_age: f64,
    pub moon_phase: PhaseName,
    /// Star count of `rating`, 1-4.
    pub stars: u8,
    /// Rating from `moon_illum`.
    pub rating: DayRating,
    #[serde(serialize_with = "serialize_utc")]
    pub sunrise_utc: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_utc")]
    pub sunset_utc: Option<DateTime<Utc>>,
}

impl DaySolunarRecord {
    pub fn majors(&self) -> [Option<DateTime<Utc>>; 2] {
        [self.major_1_utc, self.major_2_utc]
    }

    pub fn minors(&self) -> [Option<DateTime<Utc>>; 2] {
        [self.minor_1_utc, self.minor_2_utc]
    }
}

/// Records keyed by ISO date, iterated in date order.
pub type Almanac = BTreeMap<String, DaySolunarRecord>;

/// Everything an almanac run needs besides the ephemeris and the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct AlmanacConfig {
    pub location: Location,
    pub tz: Tz,
    /// First local day; today in `tz` when unset.
    pub first_date: Option<NaiveDate>,
    /// Number of consecutive local days.
    pub days: u32,
    /// Worker threads for the parallel driver.
    pub threads: usize,
    pub search: SearchConfig,
}

impl AlmanacConfig {
    pub fn new(location: Location, tz: Tz, days: u32) -> Self {
        Self {
            location,
            tz,
            first_date: None,
            days,
            threads: 1,
            search: SearchConfig::default(),
        }
    }

    pub fn with_first_date(mut self, date: NaiveDate) -> Self {
        self.first_date = Some(date);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), AlmanacError> {
        if self.days == 0 {
            return Err(AlmanacError::InvalidConfig("days must be > 0"));
        }
        if self.days > MAX_HORIZON_DAYS {
            return Err(AlmanacError::InvalidConfig("days must be at most 366"));
        }
        if self.threads == 0 {
            return Err(AlmanacError::InvalidConfig("threads must be > 0"));
        }
        self.search.validate()
    }
}
