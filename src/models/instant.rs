//! Canonical instant type.
//!
//! Every timestamp that enters the engine is normalized into an [`Instant`]:
//! epoch milliseconds in UTC. Formatting for humans happens downstream.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Calendar;

/// A point in time, stored as milliseconds since the Unix epoch (UTC).
///
/// Serialized as a plain integer of epoch milliseconds. Deserialization
/// rejects values outside the range chrono can represent.
///
/// # Example
///
/// ```
/// use roster_engine::models::Instant;
///
/// let instant = Instant::from_epoch_millis(1_746_421_200_000).unwrap();
/// assert_eq!(instant.to_string(), "2025-05-05T05:00:00.000Z");
/// assert_eq!(serde_json::to_string(&instant).unwrap(), "1746421200000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(DateTime<Utc>);

impl Instant {
    /// Creates an instant from epoch milliseconds.
    ///
    /// Returns `None` when the value is outside the representable range.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Creates an instant from a UTC date-time.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the epoch milliseconds of this instant.
    pub fn epoch_millis(self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns this instant as a UTC date-time.
    pub fn to_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the whole minutes from `self` until `later`.
    ///
    /// Negative when `later` is before `self`. Partial minutes are truncated.
    ///
    /// ```
    /// use roster_engine::models::Instant;
    ///
    /// let nine = Instant::from_epoch_millis(1_746_435_600_000).unwrap();
    /// let five = Instant::from_epoch_millis(1_746_464_400_000).unwrap();
    /// assert_eq!(nine.minutes_until(five), 480);
    /// assert_eq!(five.minutes_until(nine), -480);
    /// ```
    pub fn minutes_until(self, later: Instant) -> i64 {
        (later.0 - self.0).num_minutes()
    }

    /// Returns the calendar date of this instant in the given calendar.
    pub fn local_date(self, calendar: &Calendar) -> NaiveDate {
        self.0.with_timezone(&calendar.offset()).date_naive()
    }

    /// Returns this instant shifted by a number of minutes, if representable.
    pub fn plus_minutes(self, minutes: i64) -> Option<Self> {
        self.0
            .checked_add_signed(Duration::minutes(minutes))
            .map(Self)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.epoch_millis())
    }
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        Instant::from_epoch_millis(millis).ok_or_else(|| {
            serde::de::Error::custom(format!("epoch milliseconds out of range: {}", millis))
        })
    }
}
