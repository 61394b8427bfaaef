//! Local calendar days mapped onto UTC search windows.
//!
//! A [`LocalDayWindow`] is the half-open UTC interval `[start_utc, end_utc)`
//! that begins at local midnight of a calendar date in a tz-database zone.
//! The start is resolved with the zone's rules for that specific date, so
//! daylight-saving transitions move it by the DST shift instead of using a
//! fixed offset.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::TimeError;

/// Length of every day window. Fixed at 24 h, including DST transition days.
pub const DAY_WINDOW_HOURS: i64 = 24;

/// Step used to walk past a DST gap that swallows local midnight.
const GAP_STEP_MINUTES: i64 = 15;

/// Longest DST gap we are prepared to walk across.
const MAX_GAP_MINUTES: i64 = 240;

/// Parse an IANA timezone identifier such as `America/Chicago`.
pub fn parse_timezone(name: &str) -> Result<Tz, TimeError> {
    name.parse::<Tz>()
        .map_err(|_| TimeError::UnknownTimezone(name.to_string()))
}

/// The calendar date in `tz` at the instant `now`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Resolve a local wall-clock time to UTC.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant.
/// Nonexistent times (DST spring-forward) return `None`.
fn resolve_local(tz: Tz, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(local) {
        LocalResult::Single(t) => Some(t.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// UTC instant of local midnight on `date` in `tz`.
///
/// Zones that skip midnight on their DST date get the first valid local
/// instant after midnight.
pub fn local_midnight_utc(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, TimeError> {
    let midnight = date.and_time(NaiveTime::MIN);
    let mut offset = 0;
    while offset <= MAX_GAP_MINUTES {
        let local = midnight + TimeDelta::minutes(offset);
        if let Some(t) = resolve_local(tz, &local) {
            return Ok(t);
        }
        offset += GAP_STEP_MINUTES;
    }
    Err(TimeError::NoLocalMidnight {
        date,
        tz: tz.name().to_string(),
    })
}

/// A local calendar day and its UTC window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDayWindow {
    date: NaiveDate,
    tz: Tz,
    start_utc: DateTime<Utc>,
    end_utc: DateTime<Utc>,
}

impl LocalDayWindow {
    /// Build the window for `date` in `tz`.
    pub fn new(date: NaiveDate, tz: Tz) -> Result<Self, TimeError> {
        let start_utc = local_midnight_utc(date, tz)?;
        Ok(Self {
            date,
            tz,
            start_utc,
            end_utc: start_utc + TimeDelta::hours(DAY_WINDOW_HOURS),
        })
    }

    /// Window for the day `days` after this one.
    pub fn offset_days(&self, days: u64) -> Result<Self, TimeError> {
        let date = self
            .date
            .checked_add_days(chrono::Days::new(days))
            .ok_or(TimeError::DateOutOfRange("local day offset"))?;
        Self::new(date, self.tz)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Inclusive start of the window.
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start_utc
    }

    /// Exclusive end of the window.
    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end_utc
    }

    /// Date key in ISO form (`YYYY-MM-DD`).
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Whether `t` lies in `[start_utc, end_utc)`.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start_utc && t < self.end_utc
    }

    /// The window widened by `margin` on both sides.
    pub fn padded(&self, margin: TimeDelta) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start_utc - margin, self.end_utc + margin)
    }
}
