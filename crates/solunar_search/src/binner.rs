//! Day-window binner: selects the major and minor periods of one local day.

use chrono::NaiveDate;
use chrono_tz::Tz;
use log::debug;
use solunar_ephem::{EphemerisPort, EventKind, Location};
use solunar_time::LocalDayWindow;

use crate::error::AlmanacError;
use crate::event_types::{Event, EventStream, SearchConfig};
use crate::events::search_events;

/// Periods kept per class (major or minor) for one day.
pub const PERIODS_PER_CLASS: usize = 2;

/// Major and minor events of one local day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBins {
    pub window: LocalDayWindow,
    /// Transit events inside the window, ascending, at most two.
    pub major_events: Vec<Event>,
    /// Rise/set events inside the window, ascending, at most two.
    pub minor_events: Vec<Event>,
    /// A search loop ran out of budget for this day.
    pub exhausted: bool,
    /// Kinds dropped for this day because the ephemeris failed.
    pub abandoned: Vec<EventKind>,
}

impl DayBins {
    /// `n`-th major instant, if present.
    pub fn major(&self, n: usize) -> Option<Event> {
        self.major_events.get(n).copied()
    }

    /// `n`-th minor instant, if present.
    pub fn minor(&self, n: usize) -> Option<Event> {
        self.minor_events.get(n).copied()
    }
}

/// First [`PERIODS_PER_CLASS`] events of `kinds` inside `window`, ascending.
pub fn select_periods(
    stream: &EventStream,
    window: &LocalDayWindow,
    kinds: &[EventKind],
) -> Vec<Event> {
    let mut selected: Vec<Event> = stream
        .of_kinds(kinds)
        .filter(|e| window.contains(e.at))
        .collect();
    selected.sort_by_key(|e| (e.at, e.kind));
    selected.dedup();
    selected.truncate(PERIODS_PER_CLASS);
    selected
}

/// Search around `window` and bin the results.
///
/// `config` is assumed valid; see [`bin_day`] for the checked entry point.
pub fn bin_window<P: EphemerisPort + ?Sized>(
    port: &P,
    location: &Location,
    window: LocalDayWindow,
    config: &SearchConfig,
) -> DayBins {
    let (search_start, search_end) = window.padded(config.margin);
    let stream = search_events(port, location, search_start, search_end, config);

    let major_events = select_periods(&stream, &window, &EventKind::TRANSITS);
    let minor_events = select_periods(&stream, &window, &EventKind::HORIZON);
    debug!(
        "{}: {} events searched, {} major, {} minor",
        window.iso_date(),
        stream.len(),
        major_events.len(),
        minor_events.len()
    );

    DayBins {
        window,
        major_events,
        minor_events,
        exhausted: stream.exhausted,
        abandoned: stream.abandoned,
    }
}

/// Major and minor periods for local calendar day `date` in `tz`.
pub fn bin_day<P: EphemerisPort + ?Sized>(
    port: &P,
    location: &Location,
    date: NaiveDate,
    tz: Tz,
    config: &SearchConfig,
) -> Result<DayBins, AlmanacError> {
    config.validate()?;
    let window = LocalDayWindow::new(date, tz)?;
    Ok(bin_window(port, location, window, config))
}
