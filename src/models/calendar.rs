//! The engine's reference calendar.
//!
//! Local calendar readings (legacy tuple timestamps, naive ISO strings, day
//! and week boundaries) are interpreted in a fixed UTC offset.

use chrono::{FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

use super::Instant;

/// A calendar anchored at a fixed UTC offset.
///
/// # Example
///
/// ```
/// use roster_engine::models::Calendar;
///
/// let calendar = Calendar::from_offset_minutes(600).unwrap(); // UTC+10:00
/// assert_eq!(calendar.offset_minutes(), 600);
/// assert!(Calendar::from_offset_minutes(24 * 60).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    /// The UTC calendar.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Creates a calendar east of UTC by the given number of minutes.
    ///
    /// Returns `None` unless the offset is strictly within one day.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
    }

    /// Returns the offset from UTC in minutes.
    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Returns the underlying chrono offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Reads a local wall-clock date-time as an instant.
    pub fn instant_from_local(&self, local: NaiveDateTime) -> Option<Instant> {
        self.offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| Instant::from_datetime(dt.with_timezone(&Utc)))
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}
