//! Record assembly and the multi-day horizon driver.

use std::ops::Range;
use std::thread;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use solunar_ephem::{Body, EphemerisPort, EventKind, Location};
use solunar_time::{LocalDayWindow, today_in};

use crate::almanac_types::{Almanac, AlmanacConfig, DaySolunarRecord};
use crate::binner::{DayBins, bin_window};
use crate::error::AlmanacError;
use crate::phase_age::{DayRating, EpochReference, MoonPhase, phase_and_age, round1};

/// First sunrise and first sunset inside a day window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

fn first_sun_event<P: EphemerisPort + ?Sized>(
    port: &P,
    location: &Location,
    kind: EventKind,
    window: &LocalDayWindow,
) -> Option<DateTime<Utc>> {
    let after = window.start_utc() - TimeDelta::milliseconds(1);
    match port.next_event(location, Body::Sun, kind, after) {
        Ok(outcome) => outcome.instant().filter(|t| window.contains(*t)),
        Err(e) => {
            warn!("sun {} on {}: {e}", kind.name(), window.iso_date());
            None
        }
    }
}

/// Sunrise and sunset for the day. Failures leave the slot empty.
pub fn sun_times<P: EphemerisPort + ?Sized>(
    port: &P,
    location: &Location,
    window: &LocalDayWindow,
) -> SunTimes {
    SunTimes {
        sunrise: first_sun_event(port, location, EventKind::Rise, window),
        sunset: first_sun_event(port, location, EventKind::Set, window),
    }
}

/// Package one day's results into a record.
pub fn assemble_record(bins: &DayBins, phase: &MoonPhase, sun: SunTimes) -> DaySolunarRecord {
    let rating = DayRating::from_illumination(phase.illumination_pct);
    DaySolunarRecord {
        date: bins.window.iso_date(),
        major_1_utc: bins.major(0).map(|e| e.at),
        major_2_utc: bins.major(1).map(|e| e.at),
        minor_1_utc: bins.minor(0).map(|e| e.at),
        minor_2_utc: bins.minor(1).map(|e| e.at),
        moon_illum: phase.illumination_pct,
        moon_age: round1(phase.age_days),
        moon_phase: phase.phase_name,
        stars: rating.stars(),
        rating,
        sunrise_utc: sun.sunrise,
        sunset_utc: sun.sunset,
    }
}

/// Compute the record for one day window.
pub fn compute_day<P: EphemerisPort + ?Sized>(
    port: &P,
    config: &AlmanacConfig,
    window: LocalDayWindow,
    epoch: &EpochReference,
) -> Result<DaySolunarRecord, AlmanacError> {
    let bins = bin_window(port, &config.location, window, &config.search);
    if bins.exhausted {
        warn!("{}: search budget exhausted, periods may be missing", window.iso_date());
    }
    for kind in &bins.abandoned {
        warn!("{}: moon {} abandoned", window.iso_date(), kind.name());
    }
    let phase = phase_and_age(port, &config.location, window.start_utc(), epoch)?;
    let sun = sun_times(port, &config.location, &window);
    Ok(assemble_record(&bins, &phase, sun))
}

fn first_window(config: &AlmanacConfig, now: DateTime<Utc>) -> Result<LocalDayWindow, AlmanacError> {
    let date = config.first_date.unwrap_or_else(|| today_in(config.tz, now));
    Ok(LocalDayWindow::new(date, config.tz)?)
}

fn compute_range<P: EphemerisPort + ?Sized>(
    port: &P,
    config: &AlmanacConfig,
    first: &LocalDayWindow,
    epoch: &EpochReference,
    days: Range<u32>,
) -> Result<Vec<DaySolunarRecord>, AlmanacError> {
    days.map(|i| -> Result<DaySolunarRecord, AlmanacError> {
        let window = first.offset_days(u64::from(i))?;
        debug!("computing {}", window.iso_date());
        compute_day(port, config, window, epoch)
    })
    .collect()
}

/// Compute `config.days` records with a given epoch.
pub fn compute_almanac_with_epoch<P: EphemerisPort + ?Sized>(
    port: &P,
    config: &AlmanacConfig,
    now: DateTime<Utc>,
    epoch: &EpochReference,
) -> Result<Almanac, AlmanacError> {
    config.validate()?;
    sequential_almanac(port, config, now, epoch)
}

fn sequential_almanac<P: EphemerisPort + ?Sized>(
    port: &P,
    config: &AlmanacConfig,
    now: DateTime<Utc>,
    epoch: &EpochReference,
) -> Result<Almanac, AlmanacError> {
    let first = first_window(config, now)?;
    let records = compute_range(port, config, &first, epoch, 0..config.days)?;
    Ok(records.into_iter().map(|r| (r.date.clone(), r)).collect())
}

/// Compute the almanac sequentially.
///
/// `now` fixes both the epoch (most recent new moon before it) and, when
/// `config.first_date` is unset, the first local day.
pub fn compute_almanac<P: EphemerisPort + ?Sized>(
    port: &P,
    config: &AlmanacConfig,
    now: DateTime<Utc>,
) -> Result<Almanac, AlmanacError> {
    config.validate()?;
    resolve_and_compute(port, config, now)
}

fn resolve_and_compute<P: EphemerisPort + ?Sized>(
    port: &P,
    config: &AlmanacConfig,
    now: DateTime<Utc>,
) -> Result<Almanac, AlmanacError> {
    let epoch = EpochReference::resolve(port, now)?;
    info!(
        "computing {} day(s) at ({}, {}) in {}",
        config.days,
        config.location.latitude_deg,
        config.location.longitude_deg,
        config.tz.name()
    );
    let almanac = sequential_almanac(port, config, now, &epoch)?;
    info!("computed {} record(s)", almanac.len());
    Ok(almanac)
}

/// Split `0..days` into at most `parts` contiguous ranges.
fn split_days(days: u32, parts: usize) -> Vec<Range<u32>> {
    let parts = parts.clamp(1, days.max(1) as usize) as u32;
    let base = days / parts;
    let extra = days % parts;
    let mut start = 0;
    (0..parts)
        .map(|p| {
            let len = base + u32::from(p < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Compute the almanac on `config.threads` scoped worker threads.
///
/// Output is identical to [`compute_almanac`].
pub fn compute_almanac_parallel<P: EphemerisPort + Sync + ?Sized>(
    port: &P,
    config: &AlmanacConfig,
    now: DateTime<Utc>,
) -> Result<Almanac, AlmanacError> {
    config.validate()?;
    if config.threads == 1 {
        return resolve_and_compute(port, config, now);
    }
    let epoch = EpochReference::resolve(port, now)?;
    let first = first_window(config, now)?;
    let ranges = split_days(config.days, config.threads);
    info!(
        "computing {} day(s) on {} thread(s) in {}",
        config.days,
        ranges.len(),
        config.tz.name()
    );

    let chunks = thread::scope(|s| {
        let handles: Vec<_> = ranges
            .into_iter()
            .map(|days| {
                let (epoch, first) = (&epoch, &first);
                s.spawn(move || compute_range(port, config, first, epoch, days))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(records) => records,
                Err(_) => Err(AlmanacError::WorkerPanicked),
            })
            .collect::<Result<Vec<_>, AlmanacError>>()
    })?;

    let almanac: Almanac = chunks
        .into_iter()
        .flatten()
        .map(|r| (r.date.clone(), r))
        .collect();
    info!("computed {} record(s)", almanac.len());
    Ok(almanac)
}
