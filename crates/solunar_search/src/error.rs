//! Error types for the almanac engine.

use solunar_ephem::EphemError;
use solunar_time::TimeError;
use thiserror::Error;

/// Errors that abort an almanac run or a single-day computation.
///
/// Per-kind search failures never surface here; they are recorded on the
/// [`EventStream`](crate::EventStream) and the day continues.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AlmanacError {
    /// Configuration rejected before any day was computed.
    #[error("invalid almanac config: {0}")]
    InvalidConfig(&'static str),
    /// Phase, epoch, or location failure from the ephemeris.
    #[error(transparent)]
    Ephem(#[from] EphemError),
    /// Timezone or day-window failure.
    #[error(transparent)]
    Time(#[from] TimeError),
    /// A parallel worker panicked.
    #[error("almanac worker thread panicked")]
    WorkerPanicked,
}
