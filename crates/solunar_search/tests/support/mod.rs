//! Scripted ephemeris for scenario tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::f64::consts::TAU;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use solunar_ephem::{Body, EphemError, EphemerisPort, EventKind, Location, SearchOutcome};
use solunar_search::SYNODIC_PERIOD_DAYS;
use solunar_time::{add_days, days_between};

/// Ephemeris that replays fixed event lists.
///
/// A kind with no scripted instant after the query reports `NeverOccurs`.
/// Phase follows an ideal synodic cycle from `new_moon`.
pub struct ScriptedPort {
    events: HashMap<(Body, EventKind), Vec<DateTime<Utc>>>,
    failing: Vec<EventKind>,
    pub new_moon: DateTime<Utc>,
}

impl ScriptedPort {
    pub fn new(new_moon: DateTime<Utc>) -> Self {
        Self {
            events: HashMap::new(),
            failing: Vec::new(),
            new_moon,
        }
    }

    pub fn with_events(
        mut self,
        body: Body,
        kind: EventKind,
        times: impl IntoIterator<Item = DateTime<Utc>>,
    ) -> Self {
        let list = self.events.entry((body, kind)).or_default();
        list.extend(times);
        list.sort();
        self
    }

    /// Moon events of `kind` every `period`, starting at `first`, until `until`.
    pub fn with_periodic(
        self,
        kind: EventKind,
        first: DateTime<Utc>,
        period: TimeDelta,
        until: DateTime<Utc>,
    ) -> Self {
        let times = std::iter::successors(Some(first), move |t| Some(*t + period))
            .take_while(move |t| *t < until);
        self.with_events(Body::Moon, kind, times)
    }

    /// Moon kind whose searches always fail.
    pub fn failing(mut self, kind: EventKind) -> Self {
        self.failing.push(kind);
        self
    }

    /// Transits, rises and sets on a realistic ~24h50m cadence.
    pub fn lunar_cadence(new_moon: DateTime<Utc>, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        let lunar_day = TimeDelta::minutes(24 * 60 + 50);
        Self::new(new_moon)
            .with_periodic(EventKind::UpperTransit, from + TimeDelta::hours(2), lunar_day, until)
            .with_periodic(
                EventKind::LowerTransit,
                from + TimeDelta::minutes(14 * 60 + 25),
                lunar_day,
                until,
            )
            .with_periodic(
                EventKind::Rise,
                from + TimeDelta::minutes(20 * 60 + 10),
                lunar_day,
                until,
            )
            .with_periodic(EventKind::Set, from + TimeDelta::minutes(8 * 60 + 40), lunar_day, until)
    }
}

impl EphemerisPort for ScriptedPort {
    fn phase_fraction(&self, _location: &Location, at: DateTime<Utc>) -> Result<f64, EphemError> {
        let age = days_between(self.new_moon, at);
        Ok((1.0 - (TAU * age / SYNODIC_PERIOD_DAYS).cos()) / 2.0)
    }

    fn next_event(
        &self,
        _location: &Location,
        body: Body,
        kind: EventKind,
        after: DateTime<Utc>,
    ) -> Result<SearchOutcome, EphemError> {
        if body == Body::Moon && self.failing.contains(&kind) {
            return Err(EphemError::Computation("scripted failure"));
        }
        let Some(times) = self.events.get(&(body, kind)) else {
            return Ok(SearchOutcome::NeverOccurs);
        };
        let idx = times.partition_point(|t| *t <= after);
        Ok(times
            .get(idx)
            .map_or(SearchOutcome::NeverOccurs, |t| SearchOutcome::Found(*t)))
    }

    fn previous_new_moon(&self, before: DateTime<Utc>) -> Result<DateTime<Utc>, EphemError> {
        let cycles = (days_between(self.new_moon, before) / SYNODIC_PERIOD_DAYS).floor();
        let mut t = add_days(self.new_moon, cycles * SYNODIC_PERIOD_DAYS);
        if t >= before {
            t = add_days(t, -SYNODIC_PERIOD_DAYS);
        }
        Ok(t)
    }
}

pub fn minden() -> Location {
    Location::new(32.4619, -93.3486).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
