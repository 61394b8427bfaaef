//! Property tests for period selection and moon age.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::America::Chicago;
use proptest::prelude::*;
use solunar_ephem::EventKind;
use solunar_search::{
    EpochReference, Event, EventStream, PERIODS_PER_CLASS, SYNODIC_PERIOD_DAYS, moon_age_days,
    select_periods,
};
use solunar_time::LocalDayWindow;

fn window(day_offset: u64) -> LocalDayWindow {
    let first = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    LocalDayWindow::new(first, Chicago)
        .unwrap()
        .offset_days(day_offset)
        .unwrap()
}

fn kind_strategy() -> impl Strategy<Value = EventKind> {
    prop_oneof![
        Just(EventKind::UpperTransit),
        Just(EventKind::LowerTransit),
        Just(EventKind::Rise),
        Just(EventKind::Set),
    ]
}

fn stream_around(w: &LocalDayWindow, raw: &[(EventKind, i64)]) -> EventStream {
    let base: DateTime<Utc> = w.start_utc();
    EventStream {
        events: raw
            .iter()
            .map(|&(kind, minutes)| Event::new(kind, base + TimeDelta::minutes(minutes)))
            .collect(),
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn selections_are_sorted_bounded_and_inside(
        day in 0u64..365,
        raw in prop::collection::vec((kind_strategy(), -1440i64..2880), 0..24),
    ) {
        let w = window(day);
        let stream = stream_around(&w, &raw);
        for kinds in [EventKind::TRANSITS, EventKind::HORIZON] {
            let picked = select_periods(&stream, &w, &kinds);
            prop_assert!(picked.len() <= PERIODS_PER_CLASS);
            prop_assert!(picked.windows(2).all(|p| p[0].at <= p[1].at));
            prop_assert!(picked.iter().all(|e| w.contains(e.at) && kinds.contains(&e.kind)));
        }
    }

    #[test]
    fn selection_takes_the_earliest_in_window(
        raw in prop::collection::vec((kind_strategy(), -1440i64..2880), 0..24),
    ) {
        let w = window(40);
        let stream = stream_around(&w, &raw);
        let picked = select_periods(&stream, &w, &EventKind::TRANSITS);
        let mut inside: Vec<_> = stream
            .of_kinds(&EventKind::TRANSITS)
            .filter(|e| w.contains(e.at))
            .map(|e| (e.at, e.kind))
            .collect();
        inside.sort();
        inside.dedup();
        let expected: Vec<_> = inside.into_iter().take(PERIODS_PER_CLASS).map(|(at, _)| at).collect();
        let got: Vec<_> = picked.iter().map(|e| e.at).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn age_is_always_in_range(offset_minutes in -200_000i64..200_000) {
        let epoch = EpochReference::from_new_moon(window(0).start_utc());
        let t = epoch.new_moon() + TimeDelta::minutes(offset_minutes);
        let age = moon_age_days(t, &epoch);
        prop_assert!((0.0..SYNODIC_PERIOD_DAYS).contains(&age));
    }
}
