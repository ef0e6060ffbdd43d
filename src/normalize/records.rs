//! Record-level normalization.
//!
//! Lifts wire records into canonical ones. Batch conversion is
//! partial-failure tolerant: a record whose timestamps cannot be decoded is
//! skipped and listed in the returned error list.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TimestampNormalizer;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ExchangeRequest, Instant, RawExchangeRequest, RawShiftRecord, RawTimestamp, RawWorkSession,
    ShiftRecord, WorkSession,
};

/// A per-record failure surfaced to the caller of a collection operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordError {
    /// The ID of the shift or work session that was skipped.
    pub record_id: String,
    /// The machine-readable error code.
    pub code: String,
    /// The human-readable error message.
    pub message: String,
}

impl RecordError {
    /// Builds a record error from an engine error.
    pub fn new(record_id: impl Into<String>, error: &EngineError) -> Self {
        Self {
            record_id: record_id.into(),
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

type Decode<'a> = dyn Fn(&RawTimestamp) -> EngineResult<Instant> + 'a;

/// The outcome of normalizing a batch of shift records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedShifts {
    /// The records that decoded successfully, in input order.
    pub shifts: Vec<ShiftRecord>,
    /// One entry per skipped record.
    pub errors: Vec<RecordError>,
}

impl TimestampNormalizer {
    /// Normalizes a single work session.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimestamp`] if any present timestamp
    /// fails to decode.
    pub fn normalize_work_session(&self, raw: &RawWorkSession) -> EngineResult<WorkSession> {
        self.work_session_with(raw, &|value| self.normalize(value))
    }

    /// Normalizes a single shift record, including its work session.
    ///
    /// The interval is not validated here; calendar views still list shifts
    /// whose end precedes their start.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimestamp`] if any timestamp fails to
    /// decode.
    pub fn normalize_shift(&self, raw: &RawShiftRecord) -> EngineResult<ShiftRecord> {
        self.shift_with(raw, &|value| self.normalize(value))
    }

    /// Normalizes a batch of shift records, skipping the ones that fail.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_engine::models::{RawShiftRecord, RawTimestamp};
    /// use roster_engine::normalize::TimestampNormalizer;
    ///
    /// let good = RawShiftRecord {
    ///     id: "shift_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     start_time: RawTimestamp::from("2025-05-05T09:00:00Z"),
    ///     end_time: RawTimestamp::from("2025-05-05T17:00:00Z"),
    ///     position: String::new(),
    ///     work_session: None,
    /// };
    /// let mut bad = good.clone();
    /// bad.id = "shift_002".to_string();
    /// bad.end_time = RawTimestamp::from("soon");
    ///
    /// let batch = TimestampNormalizer::default().normalize_shifts(&[good, bad]);
    /// assert_eq!(batch.shifts.len(), 1);
    /// assert_eq!(batch.errors[0].record_id, "shift_002");
    /// ```
    pub fn normalize_shifts(&self, raw: &[RawShiftRecord]) -> NormalizedShifts {
        self.batch_with(raw, &|value| self.normalize(value))
    }

    /// Normalizes a batch of shift records, substituting `now` for
    /// undecodable timestamps when the legacy compatibility mode is enabled.
    ///
    /// With the mode disabled this is [`Self::normalize_shifts`].
    pub fn normalize_shifts_at(&self, raw: &[RawShiftRecord], now: Instant) -> NormalizedShifts {
        self.batch_with(raw, &|value| self.normalize_or_fallback(value, now))
    }

    /// Normalizes an exchange request and both of its shifts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimestamp`] if any timestamp fails to
    /// decode.
    pub fn normalize_exchange_request(
        &self,
        raw: &RawExchangeRequest,
    ) -> EngineResult<ExchangeRequest> {
        Ok(ExchangeRequest {
            id: raw.id.clone(),
            kind: raw.kind,
            requester_id: raw.requester_id.clone(),
            requester_shift: self.normalize_shift(&raw.requester_shift)?,
            counterpart_id: raw.counterpart_id.clone(),
            counterpart_shift: raw
                .counterpart_shift
                .as_ref()
                .map(|shift| self.normalize_shift(shift))
                .transpose()?,
            is_execution_possible: raw.is_execution_possible,
        })
    }

    fn batch_with(&self, raw: &[RawShiftRecord], decode: &Decode<'_>) -> NormalizedShifts {
        let mut batch = NormalizedShifts::default();
        for record in raw {
            match self.shift_with(record, decode) {
                Ok(shift) => batch.shifts.push(shift),
                Err(err) => {
                    warn!(shift_id = %record.id, error = %err, "Skipping shift with undecodable timestamp");
                    batch.errors.push(RecordError::new(&record.id, &err));
                }
            }
        }
        debug!(
            normalized = batch.shifts.len(),
            skipped = batch.errors.len(),
            "Normalized shift batch"
        );
        batch
    }

    fn shift_with(&self, raw: &RawShiftRecord, decode: &Decode<'_>) -> EngineResult<ShiftRecord> {
        Ok(ShiftRecord {
            id: raw.id.clone(),
            employee_id: raw.employee_id.clone(),
            start_time: decode(&raw.start_time)?,
            end_time: decode(&raw.end_time)?,
            position: raw.position.clone(),
            work_session: raw
                .work_session
                .as_ref()
                .map(|session| self.work_session_with(session, decode))
                .transpose()?,
        })
    }

    fn work_session_with(
        &self,
        raw: &RawWorkSession,
        decode: &Decode<'_>,
    ) -> EngineResult<WorkSession> {
        let optional = |value: Option<&RawTimestamp>| value.map(decode).transpose();
        Ok(WorkSession {
            id: raw.id.clone(),
            shift_id: raw.shift_id.clone(),
            clock_in_time: optional(raw.clock_in_time.as_ref())?,
            clock_out_time: optional(raw.clock_out_time.as_ref())?,
            confirmed: raw.confirmed,
            confirmed_by: raw.confirmed_by.clone(),
            confirmed_at: optional(raw.confirmed_at.as_ref())?,
            note: raw.note.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_shift(id: &str, start: RawTimestamp, end: RawTimestamp) -> RawShiftRecord {
        RawShiftRecord {
            id: id.to_string(),
            employee_id: "emp_001".to_string(),
            start_time: start,
            end_time: end,
            position: "cook".to_string(),
            work_session: None,
        }
    }

    #[test]
    fn test_normalize_shift_with_session() {
        let mut raw = raw_shift(
            "shift_001",
            RawTimestamp::from("2025-05-05T09:00:00Z"),
            RawTimestamp::Tuple(vec![2025, 5, 5, 17]),
        );
        raw.work_session = Some(RawWorkSession {
            id: "ws_001".to_string(),
            shift_id: "shift_001".to_string(),
            clock_in_time: Some(RawTimestamp::Numeric(1_746_435_600)),
            clock_out_time: Some(RawTimestamp::from("1746464400000")),
            confirmed: None,
            confirmed_by: None,
            confirmed_at: None,
            note: Some("late bus".to_string()),
        });

        let shift = TimestampNormalizer::default().normalize_shift(&raw).unwrap();
        assert_eq!(shift.scheduled_minutes().unwrap(), 480);
        let session = shift.work_session.unwrap();
        assert_eq!(session.clock_in_time, Some(shift.start_time));
        assert_eq!(session.clock_out_time, Some(shift.end_time));
        assert_eq!(session.confirmed, None);
        assert_eq!(session.note.as_deref(), Some("late bus"));
    }

    #[test]
    fn test_bad_session_timestamp_fails_whole_shift() {
        let mut raw = raw_shift(
            "shift_001",
            RawTimestamp::Numeric(1_746_435_600),
            RawTimestamp::Numeric(1_746_464_400),
        );
        let mut session = RawWorkSession {
            id: "ws_001".to_string(),
            shift_id: "shift_001".to_string(),
            clock_in_time: None,
            clock_out_time: None,
            confirmed: None,
            confirmed_by: None,
            confirmed_at: None,
            note: None,
        };
        session.confirmed_at = Some(RawTimestamp::from("whenever"));
        raw.work_session = Some(session);

        let result = TimestampNormalizer::default().normalize_shift(&raw);
        assert!(matches!(result, Err(EngineError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_inverted_interval_is_kept() {
        let raw = raw_shift(
            "shift_001",
            RawTimestamp::from("2025-05-05T17:00:00Z"),
            RawTimestamp::from("2025-05-05T09:00:00Z"),
        );
        let batch = TimestampNormalizer::default().normalize_shifts(&[raw]);
        assert_eq!(batch.shifts.len(), 1);
        assert!(batch.errors.is_empty());
        assert!(!batch.shifts[0].has_valid_interval());
    }

    #[test]
    fn test_batch_keeps_order_and_reports_failures() {
        let raws = vec![
            raw_shift("a", RawTimestamp::Numeric(100), RawTimestamp::Numeric(200)),
            raw_shift("b", RawTimestamp::from("bad"), RawTimestamp::Numeric(200)),
            raw_shift("c", RawTimestamp::Numeric(300), RawTimestamp::Numeric(400)),
            raw_shift("d", RawTimestamp::Numeric(300), RawTimestamp::Tuple(vec![1])),
        ];

        let batch = TimestampNormalizer::default().normalize_shifts(&raws);
        let ids: Vec<&str> = batch.shifts.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(batch.errors.len(), 2);
        assert_eq!(batch.errors[0].record_id, "b");
        assert_eq!(batch.errors[0].code, "INVALID_TIMESTAMP");
        assert_eq!(batch.errors[1].record_id, "d");
    }

    #[test]
    fn test_legacy_fallback_substitutes_now() {
        let now = Instant::from_epoch_millis(1_746_500_000_000).unwrap();
        let raws = vec![raw_shift(
            "shift_001",
            RawTimestamp::from("not a time"),
            RawTimestamp::Numeric(1_746_464_400),
        )];

        let strict = TimestampNormalizer::default().normalize_shifts_at(&raws, now);
        assert!(strict.shifts.is_empty());
        assert_eq!(strict.errors.len(), 1);

        let legacy = TimestampNormalizer::default()
            .with_legacy_now_fallback(true)
            .normalize_shifts_at(&raws, now);
        assert!(legacy.errors.is_empty());
        assert_eq!(legacy.shifts[0].start_time, now);
    }

    #[test]
    fn test_record_error_serialization() {
        let error = RecordError::new(
            "shift_001",
            &EngineError::InvalidTimestamp {
                raw: "x".to_string(),
                reason: "not an ISO-8601 date-time".to_string(),
            },
        );
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"recordId\":\"shift_001\""));
        assert!(json.contains("\"code\":\"INVALID_TIMESTAMP\""));
    }
}
