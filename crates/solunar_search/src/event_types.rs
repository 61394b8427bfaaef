//! Types for the event search engine.

use chrono::{DateTime, TimeDelta, Utc};
use solunar_ephem::EventKind;

use crate::error::AlmanacError;

/// Minimum padding searched on each side of a day window, in hours.
pub const MIN_MARGIN_HOURS: i64 = 12;

/// One lunar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub kind: EventKind,
    pub at: DateTime<Utc>,
}

impl Event {
    pub fn new(kind: EventKind, at: DateTime<Utc>) -> Self {
        Self { kind, at }
    }
}

/// Events found over a search window, in discovery order per search loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStream {
    pub events: Vec<Event>,
    /// A search loop hit its iteration budget before reaching the window end.
    pub exhausted: bool,
    /// Kinds dropped because the ephemeris failed while searching them.
    pub abandoned: Vec<EventKind>,
}

impl EventStream {
    /// Events of the given kinds, in stream order.
    pub fn of_kinds<'a>(&'a self, kinds: &'a [EventKind]) -> impl Iterator<Item = Event> + 'a {
        self.events
            .iter()
            .copied()
            .filter(move |e| kinds.contains(&e.kind))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Position of a search loop: where the next query starts and how many
/// queries it has spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCursor {
    pub at: DateTime<Utc>,
    pub iteration: u32,
}

impl SearchCursor {
    pub fn start(at: DateTime<Utc>) -> Self {
        Self { at, iteration: 0 }
    }

    /// Cursor after consuming an event at `event_at`.
    ///
    /// Never moves backwards, so a port that repeats an instant cannot
    /// stall the loop.
    pub fn advance_past(self, event_at: DateTime<Utc>, epsilon: TimeDelta) -> Self {
        Self {
            at: event_at.max(self.at) + epsilon,
            iteration: self.iteration + 1,
        }
    }
}

/// Configuration for event search and day binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum events appended per search loop (transits, rise/set).
    pub max_iterations: u32,
    /// Padding searched before and after each day window.
    pub margin: TimeDelta,
    /// Step past each found event before querying again.
    pub epsilon: TimeDelta,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 16,
            margin: TimeDelta::hours(MIN_MARGIN_HOURS),
            epsilon: TimeDelta::minutes(1),
        }
    }
}

impl SearchConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), AlmanacError> {
        if self.max_iterations == 0 {
            return Err(AlmanacError::InvalidConfig("max_iterations must be > 0"));
        }
        if self.margin < TimeDelta::hours(MIN_MARGIN_HOURS) {
            return Err(AlmanacError::InvalidConfig("margin must be at least 12 hours"));
        }
        if self.epsilon <= TimeDelta::zero() {
            return Err(AlmanacError::InvalidConfig("epsilon must be positive"));
        }
        if self.epsilon >= TimeDelta::hours(1) {
            return Err(AlmanacError::InvalidConfig("epsilon must be under one hour"));
        }
        Ok(())
    }
}
