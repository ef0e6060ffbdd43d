//! Wire encodings of timestamps.
//!
//! Upstream services send instants as epoch milliseconds, epoch seconds,
//! nanoseconds, numeric strings, ISO-8601 strings or a legacy
//! `[year, month, day, hour, minute, second]` tuple. [`RawTimestamp`] captures
//! the JSON shape; the normalizer decides what it means.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A timestamp as received on the wire, discriminated by JSON shape.
///
/// # Example
///
/// ```
/// use roster_engine::models::RawTimestamp;
///
/// let raw: RawTimestamp = serde_json::from_str("1746421200").unwrap();
/// assert_eq!(raw, RawTimestamp::Numeric(1_746_421_200));
///
/// let raw: RawTimestamp = serde_json::from_str("[2025, 5, 5, 5]").unwrap();
/// assert_eq!(raw, RawTimestamp::Tuple(vec![2025, 5, 5, 5]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// An integral JSON number.
    Numeric(i64),
    /// A JSON number with a fractional part (or too large for `i64`).
    Fractional(f64),
    /// A JSON string: numeric string or ISO-8601 date-time.
    Text(String),
    /// The legacy `[year, month(1-based), day, hour?, minute?, second?]` tuple.
    Tuple(Vec<i64>),
}

impl fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawTimestamp::Numeric(value) => write!(f, "{}", value),
            RawTimestamp::Fractional(value) => write!(f, "{}", value),
            RawTimestamp::Text(value) => write!(f, "{}", value),
            RawTimestamp::Tuple(parts) => write!(f, "{:?}", parts),
        }
    }
}

impl From<i64> for RawTimestamp {
    fn from(value: i64) -> Self {
        RawTimestamp::Numeric(value)
    }
}

impl From<&str> for RawTimestamp {
    fn from(value: &str) -> Self {
        RawTimestamp::Text(value.to_string())
    }
}
