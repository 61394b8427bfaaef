//! Moon illumination, age since the epoch new moon, and phase name.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use solunar_ephem::{EphemerisPort, Location};
use solunar_time::days_between;

use crate::error::AlmanacError;

/// Mean synodic month in days.
pub const SYNODIC_PERIOD_DAYS: f64 = 29.530588;

/// The new moon every age in a run is measured from.
///
/// Resolved once per run; sharing it keeps ages consistent across days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochReference {
    new_moon: DateTime<Utc>,
}

impl EpochReference {
    /// Most recent new moon strictly before `now`.
    pub fn resolve<P: EphemerisPort + ?Sized>(
        port: &P,
        now: DateTime<Utc>,
    ) -> Result<Self, AlmanacError> {
        let new_moon = port.previous_new_moon(now)?;
        debug!("epoch new moon {new_moon} (run time {now})");
        Ok(Self { new_moon })
    }

    /// Use a known new-moon instant as the epoch.
    pub fn from_new_moon(new_moon: DateTime<Utc>) -> Self {
        Self { new_moon }
    }

    pub fn new_moon(&self) -> DateTime<Utc> {
        self.new_moon
    }
}

/// Eight named phases of the synodic month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PhaseName {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl PhaseName {
    const CYCLE: [PhaseName; 8] = [
        PhaseName::NewMoon,
        PhaseName::WaxingCrescent,
        PhaseName::FirstQuarter,
        PhaseName::WaxingGibbous,
        PhaseName::FullMoon,
        PhaseName::WaningGibbous,
        PhaseName::LastQuarter,
        PhaseName::WaningCrescent,
    ];

    /// Phase for an age in days. Each phase covers an eighth of the month
    /// centred on its nominal age.
    pub fn from_age(age_days: f64) -> Self {
        let eighths = (age_days / SYNODIC_PERIOD_DAYS * 8.0 + 0.5).floor();
        let idx = (eighths as i64).rem_euclid(8) as usize;
        Self::CYCLE[idx]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fishing rating of a day, from one star (Fair) to four (Best).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DayRating {
    Fair,
    Good,
    Better,
    Best,
}

impl DayRating {
    /// Rating for an illuminated percentage.
    ///
    /// Best strictly between 40% and 95%, Better above 20%, Good above 5%.
    pub fn from_illumination(pct: f64) -> Self {
        if pct > 40.0 && pct < 95.0 {
            Self::Best
        } else if pct > 20.0 {
            Self::Better
        } else if pct > 5.0 {
            Self::Good
        } else {
            Self::Fair
        }
    }

    pub fn stars(self) -> u8 {
        match self {
            Self::Fair => 1,
            Self::Good => 2,
            Self::Better => 3,
            Self::Best => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Better => "Better",
            Self::Best => "Best",
        }
    }
}

impl std::fmt::Display for DayRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase state of the moon at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPhase {
    /// Illuminated percentage, 0-100, one decimal.
    pub illumination_pct: f64,
    /// Days since the epoch new moon, wrapped into `[0, SYNODIC_PERIOD_DAYS)`.
    pub age_days: f64,
    pub phase_name: PhaseName,
}

/// Round to one decimal place.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Age of the moon at `instant` relative to `epoch`, in `[0, SYNODIC_PERIOD_DAYS)`.
///
/// Instants before the epoch wrap backwards into the previous cycle.
pub fn moon_age_days(instant: DateTime<Utc>, epoch: &EpochReference) -> f64 {
    let age = days_between(epoch.new_moon, instant).rem_euclid(SYNODIC_PERIOD_DAYS);
    // rem_euclid of a tiny negative value rounds up to the modulus.
    if age >= SYNODIC_PERIOD_DAYS { 0.0 } else { age }
}

/// Illumination, age, and phase name at `instant`.
pub fn phase_and_age<P: EphemerisPort + ?Sized>(
    port: &P,
    location: &Location,
    instant: DateTime<Utc>,
    epoch: &EpochReference,
) -> Result<MoonPhase, AlmanacError> {
    let fraction = port.phase_fraction(location, instant)?;
    let age_days = moon_age_days(instant, epoch);
    Ok(MoonPhase {
        illumination_pct: round1((fraction * 100.0).clamp(0.0, 100.0)),
        age_days,
        phase_name: PhaseName::from_age(age_days),
    })
}
