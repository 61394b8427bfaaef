//! Analytic ephemeris port built on Meeus' lunar and solar theories.
//!
//! Every event is expressed as the upward zero crossing of a signed
//! function of time, found by a coarse forward scan followed by bisection:
//!
//! - upper transit: hour angle, wrapped to (-180, +180]
//! - lower transit: hour angle − 180°, wrapped
//! - rise: altitude − horizon altitude
//! - set: −(altitude − horizon altitude)
//!
//! The hour-angle functions jump by 360° at the opposite transit; those
//! jumps are rejected as crossings the same way a longitude wrap is.

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use solunar_time::{jd_to_utc, utc_to_jd};

use crate::error::EphemError;
use crate::meeus_types::MeeusConfig;
use crate::port::EphemerisPort;
use crate::position::{
    altitude_deg, elongation_deg, horizon_altitude_deg, hour_angle_deg, illuminated_fraction,
    normalize_to_pm180,
};
use crate::types::{Body, EventKind, Location, SearchOutcome};

/// Stateless Meeus ephemeris. Safe to share across threads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeeusEphemeris {
    config: MeeusConfig,
}

/// Check for a negative-to-non-negative crossing that is not a wrap-around.
fn is_upward_crossing(f_a: f64, f_b: f64) -> bool {
    f_a < 0.0 && f_b >= 0.0 && (f_b - f_a) < 270.0
}

/// The signed function whose upward zero crossing marks `kind`.
fn event_function(
    body: Body,
    kind: EventKind,
    location: &Location,
    jd_ut: f64,
) -> Result<f64, EphemError> {
    let value = match kind {
        EventKind::UpperTransit => hour_angle_deg(body, jd_ut, location),
        EventKind::LowerTransit => normalize_to_pm180(hour_angle_deg(body, jd_ut, location) - 180.0),
        EventKind::Rise | EventKind::Set => {
            let (alt, dist) = altitude_deg(body, jd_ut, location);
            let above = alt - horizon_altitude_deg(body, dist);
            if kind == EventKind::Rise { above } else { -above }
        }
    };
    if !value.is_finite() {
        return Err(EphemError::Computation("non-finite event function"));
    }
    Ok(value)
}

impl MeeusEphemeris {
    /// Create an ephemeris with a validated configuration.
    pub fn new(config: MeeusConfig) -> Result<Self, EphemError> {
        config.validate().map_err(EphemError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MeeusConfig {
        &self.config
    }

    /// Bisect the crossing bracketed by `[t_a, t_b]` where `f(t_a) < 0`.
    fn bisect<F>(&self, f: &F, mut t_a: f64, mut f_a: f64, mut t_b: f64) -> Result<f64, EphemError>
    where
        F: Fn(f64) -> Result<f64, EphemError>,
    {
        for _ in 0..self.config.max_iterations {
            let t_mid = 0.5 * (t_a + t_b);
            let f_mid = f(t_mid)?;
            if is_upward_crossing(f_a, f_mid) {
                t_b = t_mid;
            } else {
                t_a = t_mid;
                f_a = f_mid;
            }
            if (t_b - t_a).abs() < self.config.convergence_days {
                return Ok(0.5 * (t_a + t_b));
            }
        }
        Err(EphemError::Computation("bisection did not converge"))
    }

    /// First upward crossing of `f` after `jd_start`, within the scan horizon.
    fn scan_forward<F>(&self, f: &F, jd_start: f64) -> Result<Option<f64>, EphemError>
    where
        F: Fn(f64) -> Result<f64, EphemError>,
    {
        let step = self.config.scan_step_days;
        let max_steps = (self.config.scan_horizon_days / step).ceil() as usize;

        let mut t_prev = jd_start;
        let mut f_prev = f(t_prev)?;
        for _ in 0..max_steps {
            let t_curr = t_prev + step;
            let f_curr = f(t_curr)?;
            if is_upward_crossing(f_prev, f_curr) {
                return self.bisect(f, t_prev, f_prev, t_curr).map(Some);
            }
            t_prev = t_curr;
            f_prev = f_curr;
        }
        Ok(None)
    }
}

impl EphemerisPort for MeeusEphemeris {
    fn phase_fraction(&self, _location: &Location, at: DateTime<Utc>) -> Result<f64, EphemError> {
        let k = illuminated_fraction(utc_to_jd(at));
        if !k.is_finite() {
            return Err(EphemError::Computation("non-finite illuminated fraction"));
        }
        Ok(k)
    }

    fn next_event(
        &self,
        location: &Location,
        body: Body,
        kind: EventKind,
        after: DateTime<Utc>,
    ) -> Result<SearchOutcome, EphemError> {
        let f = |jd: f64| event_function(body, kind, location, jd);
        match self.scan_forward(&f, utc_to_jd(after))? {
            Some(jd) => {
                let t = jd_to_utc(jd)?.max(after + TimeDelta::milliseconds(1));
                Ok(SearchOutcome::Found(t))
            }
            None => {
                debug!(
                    "{body:?} {} not found within {} days after {after}",
                    kind.name(),
                    self.config.scan_horizon_days
                );
                Ok(SearchOutcome::NeverOccurs)
            }
        }
    }

    fn previous_new_moon(&self, before: DateTime<Utc>) -> Result<DateTime<Utc>, EphemError> {
        let f = |jd: f64| -> Result<f64, EphemError> {
            let e = elongation_deg(jd);
            if e.is_finite() {
                Ok(e)
            } else {
                Err(EphemError::Computation("non-finite elongation"))
            }
        };

        let jd_before = utc_to_jd(before);
        let step = self.config.new_moon_step_days;
        let max_steps = (self.config.new_moon_horizon_days / step).ceil() as usize;

        let mut t_later = jd_before;
        let mut f_later = f(t_later)?;
        for _ in 0..max_steps {
            let t_earlier = t_later - step;
            let f_earlier = f(t_earlier)?;
            if is_upward_crossing(f_earlier, f_later) {
                let jd = self.bisect(&f, t_earlier, f_earlier, t_later)?;
                let t = jd_to_utc(jd)?;
                return Ok(t.min(before - TimeDelta::milliseconds(1)));
            }
            t_later = t_earlier;
            f_later = f_earlier;
        }
        Err(EphemError::Computation("no new moon within search horizon"))
    }
}
