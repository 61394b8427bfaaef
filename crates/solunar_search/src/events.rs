//! Event search engine.
//!
//! Two independent loops walk a cursor through the search window, one for
//! the transit pair (upper/lower) and one for the horizon pair (rise/set).
//! Each step asks the ephemeris for the next event of both kinds strictly
//! after the cursor, keeps the earlier one, and moves the cursor just past
//! it. A loop ends when neither kind has an event before the window end,
//! or when its iteration budget runs out.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use solunar_ephem::{Body, EphemerisPort, EventKind, Location, SearchOutcome};

use crate::event_types::{Event, EventStream, SearchConfig, SearchCursor};

/// Search one pair of event kinds over `[start, end)`.
fn search_pair<P: EphemerisPort + ?Sized>(
    port: &P,
    location: &Location,
    kinds: [EventKind; 2],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    config: &SearchConfig,
    stream: &mut EventStream,
) {
    let mut active = [true, true];
    let mut cursor = SearchCursor::start(start);

    loop {
        let mut earliest: Option<Event> = None;
        for (slot, &kind) in kinds.iter().enumerate() {
            if !active[slot] {
                continue;
            }
            match port.next_event(location, Body::Moon, kind, cursor.at) {
                Ok(SearchOutcome::Found(at)) if at < end => {
                    if earliest.is_none_or(|e| at < e.at) {
                        earliest = Some(Event::new(kind, at));
                    }
                }
                // Later queries start further on, so this kind is done.
                Ok(SearchOutcome::Found(_)) => active[slot] = false,
                Ok(SearchOutcome::NeverOccurs) => {
                    debug!("moon {} never occurs after {}", kind.name(), cursor.at);
                    active[slot] = false;
                }
                Ok(SearchOutcome::Exhausted) => {
                    warn!("ephemeris gave up on moon {} after {}", kind.name(), cursor.at);
                    stream.exhausted = true;
                    active[slot] = false;
                }
                Err(e) => {
                    warn!("abandoning moon {} after {}: {e}", kind.name(), cursor.at);
                    stream.abandoned.push(kind);
                    active[slot] = false;
                }
            }
        }

        let Some(event) = earliest else {
            break;
        };
        if cursor.iteration >= config.max_iterations {
            warn!(
                "search budget of {} exhausted for {:?} before {end}",
                config.max_iterations, kinds
            );
            stream.exhausted = true;
            break;
        }
        stream.events.push(event);
        cursor = cursor.advance_past(event.at, config.epsilon);
    }

    debug!(
        "{:?} search from {start}: {} steps",
        kinds, cursor.iteration
    );
}

/// All moon events in `[search_start, search_end)`.
///
/// Transits come first in the stream, then rise/set events; each group is
/// in chronological order. Ephemeris failures never propagate: the failing
/// kind is recorded in [`EventStream::abandoned`] and the other kinds
/// still run.
pub fn search_events<P: EphemerisPort + ?Sized>(
    port: &P,
    location: &Location,
    search_start: DateTime<Utc>,
    search_end: DateTime<Utc>,
    config: &SearchConfig,
) -> EventStream {
    let mut stream = EventStream::default();
    if search_start >= search_end {
        return stream;
    }
    search_pair(
        port,
        location,
        EventKind::TRANSITS,
        search_start,
        search_end,
        config,
        &mut stream,
    );
    search_pair(
        port,
        location,
        EventKind::HORIZON,
        search_start,
        search_end,
        config,
        &mut stream,
    );
    stream
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use solunar_ephem::EphemError;

    /// Port with every kind recurring at a fixed period from a fixed phase.
    struct Periodic {
        origin: DateTime<Utc>,
        period: TimeDelta,
        fail: Option<EventKind>,
    }

    impl Periodic {
        fn offset(kind: EventKind) -> TimeDelta {
            match kind {
                EventKind::UpperTransit => TimeDelta::hours(1),
                EventKind::LowerTransit => TimeDelta::hours(7),
                EventKind::Rise => TimeDelta::hours(4),
                EventKind::Set => TimeDelta::hours(10),
            }
        }
    }

    impl EphemerisPort for Periodic {
        fn phase_fraction(&self, _: &Location, _: DateTime<Utc>) -> Result<f64, EphemError> {
            Ok(0.5)
        }

        fn next_event(
            &self,
            _: &Location,
            _: Body,
            kind: EventKind,
            after: DateTime<Utc>,
        ) -> Result<SearchOutcome, EphemError> {
            if self.fail == Some(kind) {
                return Err(EphemError::Computation("scripted failure"));
            }
            let mut t = self.origin + Self::offset(kind);
            while t <= after {
                t += self.period;
            }
            Ok(SearchOutcome::Found(t))
        }

        fn previous_new_moon(&self, before: DateTime<Utc>) -> Result<DateTime<Utc>, EphemError> {
            Ok(before - TimeDelta::days(1))
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn loc() -> Location {
        Location::new(32.4619, -93.3486).unwrap()
    }

    fn port(fail: Option<EventKind>) -> Periodic {
        Periodic {
            origin: t0() - TimeDelta::days(2),
            period: TimeDelta::hours(12),
            fail,
        }
    }

    #[test]
    fn finds_every_event_in_window() {
        let end = t0() + TimeDelta::hours(24);
        let stream = search_events(&port(None), &loc(), t0(), end, &SearchConfig::default());
        // Each kind recurs twice a day.
        assert_eq!(stream.len(), 8);
        assert!(!stream.exhausted);
        assert!(stream.abandoned.is_empty());
        assert!(stream.events.iter().all(|e| e.at > t0() && e.at < end));
    }

    #[test]
    fn each_pair_is_chronological() {
        let end = t0() + TimeDelta::hours(48);
        let stream = search_events(&port(None), &loc(), t0(), end, &SearchConfig::default());
        for kinds in [EventKind::TRANSITS, EventKind::HORIZON] {
            let times: Vec<_> = stream.of_kinds(&kinds).map(|e| e.at).collect();
            assert!(times.windows(2).all(|w| w[0] < w[1]), "{times:?}");
        }
    }

    #[test]
    fn failing_kind_is_abandoned() {
        let end = t0() + TimeDelta::hours(24);
        let stream = search_events(
            &port(Some(EventKind::Set)),
            &loc(),
            t0(),
            end,
            &SearchConfig::default(),
        );
        assert_eq!(stream.abandoned, vec![EventKind::Set]);
        assert_eq!(stream.of_kinds(&[EventKind::Rise]).count(), 2);
        assert_eq!(stream.of_kinds(&[EventKind::Set]).count(), 0);
        assert_eq!(stream.of_kinds(&EventKind::TRANSITS).count(), 4);
    }

    #[test]
    fn budget_exhaustion_keeps_partial_stream() {
        let config = SearchConfig {
            max_iterations: 3,
            ..Default::default()
        };
        let end = t0() + TimeDelta::hours(48);
        let stream = search_events(&port(None), &loc(), t0(), end, &config);
        assert!(stream.exhausted);
        assert_eq!(stream.of_kinds(&EventKind::TRANSITS).count(), 3);
        assert_eq!(stream.of_kinds(&EventKind::HORIZON).count(), 3);
    }

    #[test]
    fn empty_window_yields_nothing() {
        let stream = search_events(&port(None), &loc(), t0(), t0(), &SearchConfig::default());
        assert!(stream.is_empty());
        assert!(!stream.exhausted);
    }
}
