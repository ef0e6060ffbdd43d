//! Timestamp decoding.
//!
//! Converts every supported wire encoding of an instant into an [`Instant`].
//! The rules, in precedence order:
//!
//! - integral number: more than 13 digits is nanoseconds, above 10^12 is
//!   milliseconds, anything else is seconds
//! - numeric string (`^\d+(\.\d+)?$`): with a decimal point or longer than
//!   13 characters it is `floor(value * 1000)` milliseconds, otherwise the
//!   integral number rule applies
//! - any other string: ISO-8601 date-time
//! - array: `[year, month(1-based), day, hour=0, minute=0, second=0]` in
//!   the local calendar

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{Calendar, Instant, RawTimestamp};

/// Integers above this are epoch milliseconds rather than seconds.
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Integers with more digits than this are epoch nanoseconds.
pub const MAX_MILLIS_DIGITS: usize = 13;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Decodes raw timestamps against a reference calendar.
///
/// # Example
///
/// ```
/// use roster_engine::models::RawTimestamp;
/// use roster_engine::normalize::TimestampNormalizer;
///
/// let normalizer = TimestampNormalizer::default();
/// let from_seconds = normalizer.normalize(&RawTimestamp::from("1746421200")).unwrap();
/// let from_iso = normalizer.normalize(&RawTimestamp::from("2025-05-05T05:00:00Z")).unwrap();
/// assert_eq!(from_seconds, from_iso);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestampNormalizer {
    calendar: Calendar,
    legacy_now_fallback: bool,
}

impl TimestampNormalizer {
    /// Creates a normalizer reading local times in `calendar`.
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            legacy_now_fallback: false,
        }
    }

    /// Enables or disables the legacy "fall back to now" compatibility mode.
    pub fn with_legacy_now_fallback(mut self, enabled: bool) -> Self {
        self.legacy_now_fallback = enabled;
        self
    }

    /// Returns the calendar used for local readings.
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Returns true if the legacy compatibility mode is enabled.
    pub fn legacy_now_fallback(&self) -> bool {
        self.legacy_now_fallback
    }

    /// Decodes a raw timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimestamp`] if the value matches none of
    /// the recognized encodings or falls outside the representable range.
    pub fn normalize(&self, raw: &RawTimestamp) -> EngineResult<Instant> {
        match raw {
            RawTimestamp::Numeric(value) => from_integer(*value)
                .ok_or_else(|| invalid(raw, "number out of range")),
            RawTimestamp::Fractional(value) => from_fractional(*value)
                .ok_or_else(|| invalid(raw, "number out of range")),
            RawTimestamp::Text(text) => self.decode_text(raw, text),
            RawTimestamp::Tuple(parts) => self.decode_tuple(raw, parts),
        }
    }

    /// Decodes a raw timestamp, substituting `now` for undecodable input when
    /// the legacy compatibility mode is enabled.
    ///
    /// With the mode disabled this behaves exactly like [`Self::normalize`].
    /// The engine never reads the clock itself; the caller supplies `now`.
    pub fn normalize_or_fallback(&self, raw: &RawTimestamp, now: Instant) -> EngineResult<Instant> {
        match self.normalize(raw) {
            Ok(instant) => Ok(instant),
            Err(err) if self.legacy_now_fallback => {
                warn!(raw = %raw, error = %err, fallback = %now, "Falling back to caller-supplied now");
                Ok(now)
            }
            Err(err) => Err(err),
        }
    }

    fn decode_text(&self, raw: &RawTimestamp, text: &str) -> EngineResult<Instant> {
        let text = text.trim();
        if is_numeric_string(text) {
            return from_numeric_string(text).ok_or_else(|| invalid(raw, "number out of range"));
        }

        if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
            return Ok(Instant::from_datetime(datetime.with_timezone(&Utc)));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return self
                    .calendar
                    .instant_from_local(naive)
                    .ok_or_else(|| invalid(raw, "local time out of range"));
            }
        }

        // Date-only strings are read as UTC midnight.
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Instant::from_datetime(naive.and_utc()))
                .ok_or_else(|| invalid(raw, "date out of range"));
        }

        Err(invalid(raw, "not an ISO-8601 date-time"))
    }

    fn decode_tuple(&self, raw: &RawTimestamp, parts: &[i64]) -> EngineResult<Instant> {
        if !(3..=6).contains(&parts.len()) {
            return Err(invalid(raw, "expected 3 to 6 components"));
        }
        let component = |index: usize| parts.get(index).copied().unwrap_or(0);

        let year = i32::try_from(parts[0]).map_err(|_| invalid(raw, "year out of range"))?;
        let date = u32::try_from(parts[1])
            .ok()
            .zip(u32::try_from(parts[2]).ok())
            .and_then(|(month, day)| NaiveDate::from_ymd_opt(year, month, day))
            .ok_or_else(|| invalid(raw, "no such calendar date"))?;
        let local = u32::try_from(component(3))
            .ok()
            .zip(u32::try_from(component(4)).ok())
            .zip(u32::try_from(component(5)).ok())
            .and_then(|((hour, minute), second)| date.and_hms_opt(hour, minute, second))
            .ok_or_else(|| invalid(raw, "no such time of day"))?;

        self.calendar
            .instant_from_local(local)
            .ok_or_else(|| invalid(raw, "local time out of range"))
    }
}

/// Decodes a raw timestamp in the UTC calendar.
///
/// # Example
///
/// ```
/// use roster_engine::models::RawTimestamp;
/// use roster_engine::normalize::normalize;
///
/// let instant = normalize(&RawTimestamp::Tuple(vec![2025, 5, 5, 5])).unwrap();
/// assert_eq!(instant.epoch_millis(), 1_746_421_200_000);
/// assert!(normalize(&RawTimestamp::from("next tuesday")).is_err());
/// ```
pub fn normalize(raw: &RawTimestamp) -> EngineResult<Instant> {
    TimestampNormalizer::default().normalize(raw)
}

fn invalid(raw: &RawTimestamp, reason: &str) -> EngineError {
    EngineError::InvalidTimestamp {
        raw: raw.to_string(),
        reason: reason.to_string(),
    }
}

fn from_integer(value: i64) -> Option<Instant> {
    let digits = value.unsigned_abs().to_string().len();
    let millis = if digits > MAX_MILLIS_DIGITS {
        value / 1_000_000
    } else if value > MILLIS_THRESHOLD {
        value
    } else {
        value.checked_mul(1000)?
    };
    Instant::from_epoch_millis(millis)
}

fn from_fractional(value: f64) -> Option<Instant> {
    if !value.is_finite() {
        return None;
    }
    let digits = format!("{:.0}", value.trunc().abs()).len();
    let millis = if digits > MAX_MILLIS_DIGITS {
        (value / 1_000_000.0).floor()
    } else if value > MILLIS_THRESHOLD as f64 {
        value.floor()
    } else {
        (value * 1000.0).floor()
    };
    float_to_instant(millis)
}

fn from_numeric_string(text: &str) -> Option<Instant> {
    if text.contains('.') || text.len() > MAX_MILLIS_DIGITS {
        let value: f64 = text.parse().ok()?;
        return float_to_instant((value * 1000.0).floor());
    }
    from_integer(text.parse().ok()?)
}

fn float_to_instant(millis: f64) -> Option<Instant> {
    // i64::MAX is not exactly representable; the range check is conservative.
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Instant::from_epoch_millis(millis as i64)
}

/// Matches `^\d+(\.\d+)?$`.
fn is_numeric_string(text: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match text.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MAY_5_0500_MS: i64 = 1_746_421_200_000;

    fn millis(raw: RawTimestamp) -> i64 {
        normalize(&raw).unwrap().epoch_millis()
    }

    // ==========================================================================
    // Numbers
    // ==========================================================================
    #[test]
    fn test_integer_seconds() {
        assert_eq!(millis(RawTimestamp::Numeric(1_746_421_200)), MAY_5_0500_MS);
    }

    #[test]
    fn test_integer_milliseconds() {
        assert_eq!(millis(RawTimestamp::Numeric(MAY_5_0500_MS)), MAY_5_0500_MS);
    }

    #[test]
    fn test_integer_nanoseconds() {
        assert_eq!(
            millis(RawTimestamp::Numeric(1_746_421_200_000_000_000)),
            MAY_5_0500_MS
        );
    }

    #[test]
    fn test_threshold_itself_is_seconds() {
        // Exactly 10^12 is not above the threshold, so it is read as seconds.
        assert_eq!(
            millis(RawTimestamp::Numeric(MILLIS_THRESHOLD)),
            MILLIS_THRESHOLD * 1000
        );
    }

    #[test]
    fn test_fractional_seconds_floor_to_millis() {
        assert_eq!(
            millis(RawTimestamp::Fractional(1_746_421_200.5679)),
            MAY_5_0500_MS + 567
        );
    }

    #[test]
    fn test_non_finite_number_rejected() {
        assert!(normalize(&RawTimestamp::Fractional(f64::NAN)).is_err());
        assert!(normalize(&RawTimestamp::Fractional(f64::INFINITY)).is_err());
    }

    // ==========================================================================
    // Numeric strings
    // ==========================================================================
    #[test]
    fn test_numeric_string_seconds() {
        assert_eq!(millis(RawTimestamp::from("1746421200")), MAY_5_0500_MS);
    }

    #[test]
    fn test_numeric_string_milliseconds() {
        assert_eq!(millis(RawTimestamp::from("1746421200000")), MAY_5_0500_MS);
    }

    #[test]
    fn test_numeric_string_with_fraction_scales_by_thousand() {
        assert_eq!(
            millis(RawTimestamp::from("1746421200.123456789")),
            MAY_5_0500_MS + 123
        );
    }

    #[test]
    fn test_long_numeric_string_out_of_range() {
        // Longer than 13 characters: scaled by 1000, which overflows the calendar.
        let result = normalize(&RawTimestamp::from("17464212000000000000"));
        assert!(matches!(result, Err(EngineError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_numeric_string_detection() {
        assert!(is_numeric_string("123"));
        assert!(is_numeric_string("123.45"));
        assert!(!is_numeric_string("123."));
        assert!(!is_numeric_string(".5"));
        assert!(!is_numeric_string("-123"));
        assert!(!is_numeric_string("1e9"));
        assert!(!is_numeric_string(""));
    }

    // ==========================================================================
    // ISO strings
    // ==========================================================================
    #[test]
    fn test_rfc3339_utc() {
        assert_eq!(millis(RawTimestamp::from("2025-05-05T05:00:00Z")), MAY_5_0500_MS);
    }

    #[test]
    fn test_rfc3339_with_offset() {
        assert_eq!(
            millis(RawTimestamp::from("2025-05-05T07:00:00+02:00")),
            MAY_5_0500_MS
        );
    }

    #[test]
    fn test_naive_iso_uses_calendar_offset() {
        let normalizer = TimestampNormalizer::new(Calendar::from_offset_minutes(120).unwrap());
        let instant = normalizer
            .normalize(&RawTimestamp::from("2025-05-05T07:00:00"))
            .unwrap();
        assert_eq!(instant.epoch_millis(), MAY_5_0500_MS);
    }

    #[test]
    fn test_naive_iso_with_millis_and_space_separator() {
        assert_eq!(
            millis(RawTimestamp::from("2025-05-05 05:00:00.250")),
            MAY_5_0500_MS + 250
        );
        assert_eq!(millis(RawTimestamp::from("2025-05-05T05:00")), MAY_5_0500_MS);
    }

    #[test]
    fn test_date_only_is_utc_midnight() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap();
        let normalizer = TimestampNormalizer::new(Calendar::from_offset_minutes(600).unwrap());
        let instant = normalizer.normalize(&RawTimestamp::from("2025-05-05")).unwrap();
        assert_eq!(instant.to_datetime(), expected);
    }

    #[test]
    fn test_garbage_string_is_invalid_timestamp() {
        match normalize(&RawTimestamp::from("not-a-date")) {
            Err(EngineError::InvalidTimestamp { raw, reason }) => {
                assert_eq!(raw, "not-a-date");
                assert_eq!(reason, "not an ISO-8601 date-time");
            }
            other => panic!("Expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_string_is_invalid_timestamp() {
        assert!(normalize(&RawTimestamp::from("")).is_err());
    }

    // ==========================================================================
    // Tuples
    // ==========================================================================
    #[test]
    fn test_tuple_month_is_one_based() {
        assert_eq!(
            millis(RawTimestamp::Tuple(vec![2025, 5, 5, 5, 0, 0])),
            MAY_5_0500_MS
        );
    }

    #[test]
    fn test_tuple_defaults_time_to_midnight() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let instant = normalize(&RawTimestamp::Tuple(vec![2025, 1, 31])).unwrap();
        assert_eq!(instant.to_datetime(), expected);
    }

    #[test]
    fn test_tuple_uses_calendar_offset() {
        let normalizer = TimestampNormalizer::new(Calendar::from_offset_minutes(-300).unwrap());
        let instant = normalizer
            .normalize(&RawTimestamp::Tuple(vec![2025, 5, 5, 0, 0]))
            .unwrap();
        assert_eq!(instant.epoch_millis(), MAY_5_0500_MS);
    }

    #[test]
    fn test_tuple_rejects_impossible_dates() {
        assert!(normalize(&RawTimestamp::Tuple(vec![2025, 2, 30])).is_err());
        assert!(normalize(&RawTimestamp::Tuple(vec![2025, 13, 1])).is_err());
        assert!(normalize(&RawTimestamp::Tuple(vec![2025, 0, 1])).is_err());
        assert!(normalize(&RawTimestamp::Tuple(vec![2025, 5, 5, 24])).is_err());
        assert!(normalize(&RawTimestamp::Tuple(vec![2025, 5, 5, -1])).is_err());
    }

    #[test]
    fn test_tuple_rejects_wrong_arity() {
        assert!(normalize(&RawTimestamp::Tuple(vec![2025, 5])).is_err());
        assert!(normalize(&RawTimestamp::Tuple(vec![2025, 5, 5, 5, 0, 0, 0])).is_err());
    }

    // ==========================================================================
    // Consistency and fallback
    // ==========================================================================
    #[test]
    fn test_all_encodings_agree() {
        let encodings = vec![
            RawTimestamp::Numeric(MAY_5_0500_MS),
            RawTimestamp::Numeric(1_746_421_200),
            RawTimestamp::Numeric(1_746_421_200_000_000_000),
            RawTimestamp::Fractional(1_746_421_200.0),
            RawTimestamp::from("2025-05-05T05:00:00Z"),
            RawTimestamp::from("2025-05-05T05:00:00.000+00:00"),
            RawTimestamp::from("1746421200"),
            RawTimestamp::from("1746421200000"),
            RawTimestamp::from("1746421200.0"),
            RawTimestamp::Tuple(vec![2025, 5, 5, 5, 0, 0]),
        ];

        for raw in encodings {
            assert_eq!(millis(raw.clone()), MAY_5_0500_MS, "encoding {:?}", raw);
        }
    }

    #[test]
    fn test_fallback_disabled_propagates_error() {
        let now = Instant::from_epoch_millis(MAY_5_0500_MS).unwrap();
        let normalizer = TimestampNormalizer::default();
        assert!(!normalizer.legacy_now_fallback());
        let result = normalizer.normalize_or_fallback(&RawTimestamp::from("garbage"), now);
        assert!(result.is_err());
    }

    #[test]
    fn test_fallback_enabled_returns_now() {
        let now = Instant::from_epoch_millis(MAY_5_0500_MS).unwrap();
        let normalizer = TimestampNormalizer::default().with_legacy_now_fallback(true);
        let result = normalizer
            .normalize_or_fallback(&RawTimestamp::from("garbage"), now)
            .unwrap();
        assert_eq!(result, now);
    }

    #[test]
    fn test_fallback_does_not_replace_valid_values() {
        let now = Instant::from_epoch_millis(0).unwrap();
        let normalizer = TimestampNormalizer::default().with_legacy_now_fallback(true);
        let result = normalizer
            .normalize_or_fallback(&RawTimestamp::Numeric(1_746_421_200), now)
            .unwrap();
        assert_eq!(result.epoch_millis(), MAY_5_0500_MS);
    }
}
