//! Geocentric Moon and Sun positions, hour angle, altitude, and phase.
//!
//! Positions come from Meeus' truncated lunar theory and VSOP-based solar
//! theory as implemented by the `astro` crate. Input times are Julian Dates
//! in UT; ΔT is applied before querying the theories.

use std::f64::consts::TAU;

use astro::coords::{asc_frm_ecl, dec_frm_ecl};
use astro::ecliptic::mn_oblq_IAU;
use astro::time::{delta_t, julian_ephemeris_day, mn_sidr};
use solunar_time::J2000_JD;

use crate::types::{Body, Location};

/// Astronomical unit in km (IAU 2012).
pub const AU_KM: f64 = 149_597_870.7;

/// Earth equatorial radius in km, as used for lunar horizontal parallax.
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.14;

/// Standard refraction at the horizon in degrees (34').
const REFRACTION_DEG: f64 = 34.0 / 60.0;

/// Sun apparent-horizon altitude: refraction plus semidiameter (50').
const SUN_HORIZON_DEG: f64 = -50.0 / 60.0;

/// Fraction of lunar parallax in the Moon's standard altitude (Meeus 15).
const MOON_PARALLAX_FACTOR: f64 = 0.7275;

/// Geocentric ecliptic position of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    pub lon_rad: f64,
    pub lat_rad: f64,
    pub distance_km: f64,
}

/// Geocentric equatorial position of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialPosition {
    /// Right ascension in [0, 2pi).
    pub ra_rad: f64,
    pub dec_rad: f64,
    pub distance_km: f64,
}

/// Normalize an angle in degrees to (-180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Julian Ephemeris Day for a UT Julian Date.
///
/// ΔT is looked up for the calendar month the date falls in; it varies by
/// well under a second across a month.
pub fn jde_from_jd_ut(jd_ut: f64) -> f64 {
    let years = 2000.0 + (jd_ut - J2000_JD) / 365.25;
    let year = years.floor();
    let month = (((years - year) * 12.0).floor() as u8 + 1).clamp(1, 12);
    julian_ephemeris_day(jd_ut, delta_t(year as i32, month))
}

/// Geocentric ecliptic position of `body` at `jd_ut`.
pub fn ecliptic_position(body: Body, jd_ut: f64) -> EclipticPosition {
    let jde = jde_from_jd_ut(jd_ut);
    match body {
        Body::Moon => {
            let (p, dist_km) = astro::lunar::geocent_ecl_pos(jde);
            EclipticPosition {
                lon_rad: p.long.rem_euclid(TAU),
                lat_rad: p.lat,
                distance_km: dist_km,
            }
        }
        Body::Sun => {
            let (p, dist_au) = astro::sun::geocent_ecl_pos(jde);
            EclipticPosition {
                lon_rad: p.long.rem_euclid(TAU),
                lat_rad: p.lat,
                distance_km: dist_au * AU_KM,
            }
        }
    }
}

/// Geocentric equatorial position of `body` at `jd_ut`.
pub fn equatorial_position(body: Body, jd_ut: f64) -> EquatorialPosition {
    let ecl = ecliptic_position(body, jd_ut);
    let oblq = mn_oblq_IAU(jde_from_jd_ut(jd_ut));
    let ra = asc_frm_ecl(ecl.lon_rad, ecl.lat_rad, oblq);
    let dec = dec_frm_ecl(ecl.lon_rad, ecl.lat_rad, oblq);
    EquatorialPosition {
        ra_rad: ra.rem_euclid(TAU),
        dec_rad: dec,
        distance_km: ecl.distance_km,
    }
}

/// Local mean sidereal time in radians [0, 2pi).
pub fn local_sidereal_rad(jd_ut: f64, location: &Location) -> f64 {
    (mn_sidr(jd_ut) + location.longitude_rad()).rem_euclid(TAU)
}

/// Local hour angle of `body` in degrees, (-180, +180]. Zero at upper transit.
pub fn hour_angle_deg(body: Body, jd_ut: f64, location: &Location) -> f64 {
    let eq = equatorial_position(body, jd_ut);
    normalize_to_pm180((local_sidereal_rad(jd_ut, location) - eq.ra_rad).to_degrees())
}

/// Geocentric altitude of `body` in degrees, and its distance in km.
pub fn altitude_deg(body: Body, jd_ut: f64, location: &Location) -> (f64, f64) {
    let eq = equatorial_position(body, jd_ut);
    let ha = local_sidereal_rad(jd_ut, location) - eq.ra_rad;
    let phi = location.latitude_rad();
    let sin_alt = phi.sin() * eq.dec_rad.sin() + phi.cos() * eq.dec_rad.cos() * ha.cos();
    (sin_alt.clamp(-1.0, 1.0).asin().to_degrees(), eq.distance_km)
}

/// Lunar equatorial horizontal parallax in degrees.
pub fn lunar_parallax_deg(distance_km: f64) -> f64 {
    (EARTH_EQUATORIAL_RADIUS_KM / distance_km).asin().to_degrees()
}

/// Geocentric altitude at which `body` is on the apparent horizon.
///
/// Moon: `0.7275 * parallax - 34'` (Meeus 15). Sun: `-50'`.
pub fn horizon_altitude_deg(body: Body, distance_km: f64) -> f64 {
    match body {
        Body::Moon => MOON_PARALLAX_FACTOR * lunar_parallax_deg(distance_km) - REFRACTION_DEG,
        Body::Sun => SUN_HORIZON_DEG,
    }
}

/// Moon − Sun ecliptic longitude in degrees, (-180, +180]. Zero at new moon.
pub fn elongation_deg(jd_ut: f64) -> f64 {
    let moon = ecliptic_position(Body::Moon, jd_ut);
    let sun = ecliptic_position(Body::Sun, jd_ut);
    normalize_to_pm180((moon.lon_rad - sun.lon_rad).to_degrees())
}

/// Illuminated fraction of the lunar disk in [0, 1] (Meeus 48.1–48.3).
pub fn illuminated_fraction(jd_ut: f64) -> f64 {
    let moon = ecliptic_position(Body::Moon, jd_ut);
    let sun = ecliptic_position(Body::Sun, jd_ut);
    let cos_psi = moon.lat_rad.cos() * (moon.lon_rad - sun.lon_rad).cos();
    let psi = cos_psi.clamp(-1.0, 1.0).acos();
    let phase_angle = (sun.distance_km * psi.sin())
        .atan2(moon.distance_km - sun.distance_km * psi.cos());
    ((1.0 + phase_angle.cos()) / 2.0).clamp(0.0, 1.0)
}
