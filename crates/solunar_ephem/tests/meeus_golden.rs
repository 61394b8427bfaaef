//! Golden-value tests for the Meeus ephemeris port.
//!
//! Validates against published new/full moon times and the regular cadence
//! of lunar transits.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use solunar_ephem::{Body, EphemerisPort, EventKind, Location, MeeusEphemeris, SearchOutcome};

fn minden() -> Location {
    Location::new(32.4619, -93.3486).unwrap()
}

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn found(outcome: SearchOutcome) -> DateTime<Utc> {
    match outcome {
        SearchOutcome::Found(t) => t,
        other => panic!("expected an event, got {other:?}"),
    }
}

/// NASA: New Moon 2024-Jan-11 11:57 UTC
#[test]
fn new_moon_jan_2024() {
    let eph = MeeusEphemeris::default();
    let nm = eph.previous_new_moon(utc(2024, 1, 20, 0, 0)).unwrap();
    let diff_h = (nm - utc(2024, 1, 11, 11, 57)).num_minutes().abs() as f64 / 60.0;
    assert!(diff_h < 2.0, "off by {diff_h:.1}h, got {nm}");
}

/// NASA: New Moon 2025-Nov-20 06:47 UTC
#[test]
fn new_moon_nov_2025() {
    let eph = MeeusEphemeris::default();
    let nm = eph.previous_new_moon(utc(2025, 12, 1, 0, 0)).unwrap();
    let diff_h = (nm - utc(2025, 11, 20, 6, 47)).num_minutes().abs() as f64 / 60.0;
    assert!(diff_h < 2.0, "off by {diff_h:.1}h, got {nm}");
}

#[test]
fn previous_new_moon_is_strictly_before() {
    let eph = MeeusEphemeris::default();
    let before = utc(2024, 1, 10, 0, 0);
    let nm = eph.previous_new_moon(before).unwrap();
    assert!(nm < before);
    // NASA: New Moon 2023-Dec-12 23:32 UTC
    let diff_h = (nm - utc(2023, 12, 12, 23, 32)).num_minutes().abs() as f64 / 60.0;
    assert!(diff_h < 2.0, "off by {diff_h:.1}h, got {nm}");
}

/// NASA: Full Moon 2024-Jan-25 17:54 UTC
#[test]
fn full_moon_illumination_jan_2024() {
    let eph = MeeusEphemeris::default();
    let k = eph.phase_fraction(&minden(), utc(2024, 1, 25, 18, 0)).unwrap();
    assert!(k > 0.97, "illuminated fraction at full moon = {k}");
}

#[test]
fn new_moon_illumination_jan_2024() {
    let eph = MeeusEphemeris::default();
    let k = eph.phase_fraction(&minden(), utc(2024, 1, 11, 12, 0)).unwrap();
    assert!(k < 0.01, "illuminated fraction at new moon = {k}");
}

#[test]
fn waxing_illumination_increases() {
    let eph = MeeusEphemeris::default();
    let k2 = eph.phase_fraction(&minden(), utc(2024, 1, 13, 12, 0)).unwrap();
    let k4 = eph.phase_fraction(&minden(), utc(2024, 1, 15, 12, 0)).unwrap();
    assert!(k2 > 0.0 && k4 > k2, "k2 = {k2}, k4 = {k4}");
}

#[test]
fn upper_transits_about_a_lunar_day_apart() {
    let eph = MeeusEphemeris::default();
    let loc = minden();
    let t1 = found(
        eph.next_event(&loc, Body::Moon, EventKind::UpperTransit, utc(2025, 11, 10, 0, 0))
            .unwrap(),
    );
    let t2 = found(
        eph.next_event(&loc, Body::Moon, EventKind::UpperTransit, t1 + TimeDelta::minutes(1))
            .unwrap(),
    );
    let gap_h = (t2 - t1).num_minutes() as f64 / 60.0;
    assert!((24.0..26.0).contains(&gap_h), "gap = {gap_h:.2}h");
}

#[test]
fn lower_transit_between_upper_transits() {
    let eph = MeeusEphemeris::default();
    let loc = minden();
    let start = utc(2025, 11, 10, 0, 0);
    let upper = found(eph.next_event(&loc, Body::Moon, EventKind::UpperTransit, start).unwrap());
    let lower = found(
        eph.next_event(&loc, Body::Moon, EventKind::LowerTransit, upper)
            .unwrap(),
    );
    let gap_h = (lower - upper).num_minutes() as f64 / 60.0;
    assert!((11.5..13.5).contains(&gap_h), "upper→lower gap = {gap_h:.2}h");
}

#[test]
fn rise_precedes_upper_transit_precedes_set() {
    let eph = MeeusEphemeris::default();
    let loc = minden();
    let rise = found(
        eph.next_event(&loc, Body::Moon, EventKind::Rise, utc(2025, 6, 1, 0, 0))
            .unwrap(),
    );
    let transit = found(eph.next_event(&loc, Body::Moon, EventKind::UpperTransit, rise).unwrap());
    let set = found(eph.next_event(&loc, Body::Moon, EventKind::Set, rise).unwrap());
    assert!(rise < transit && transit < set, "{rise} {transit} {set}");
}

#[test]
fn events_are_strictly_after_cursor() {
    let eph = MeeusEphemeris::default();
    let loc = minden();
    let after = utc(2025, 3, 9, 6, 0);
    for kind in EventKind::ALL {
        if let SearchOutcome::Found(t) = eph.next_event(&loc, Body::Moon, kind, after).unwrap() {
            assert!(t > after, "{kind:?} at {t} not after {after}");
        }
    }
}

/// Sun transit at Minden on the equinox is close to local apparent noon
/// (mean noon 18:13 UTC at 93.35° W, plus about 7 minutes of equation of time).
#[test]
fn sun_upper_transit_near_noon() {
    let eph = MeeusEphemeris::default();
    let t = found(
        eph.next_event(&minden(), Body::Sun, EventKind::UpperTransit, utc(2025, 3, 20, 12, 0))
            .unwrap(),
    );
    let diff_min = (t - utc(2025, 3, 20, 18, 20)).num_minutes().abs();
    assert!(diff_min < 15, "sun transit at {t}");
}

/// 2025 sits near a major lunar standstill; at 80° N the Moon spends days
/// circumpolar or below the horizon each month.
#[test]
fn high_latitude_moon_sometimes_never_rises() {
    let eph = MeeusEphemeris::default();
    let loc = Location::new(80.0, 15.0).unwrap();
    let start = utc(2025, 1, 1, 0, 0);
    let mut never = 0;
    for day in 0..30 {
        let after = start + TimeDelta::days(day);
        let outcome = eph.next_event(&loc, Body::Moon, EventKind::Rise, after).unwrap();
        if outcome == SearchOutcome::NeverOccurs {
            never += 1;
        }
    }
    assert!(never > 0, "expected some NeverOccurs rise searches at 80N");
}
