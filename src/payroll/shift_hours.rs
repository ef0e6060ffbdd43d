//! Per-shift scheduled vs. actual time.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::ShiftRecord;
use crate::normalize::RecordError;
use crate::session::{SessionState, resolve_shift_state};

/// Scheduled and actual minutes of a single shift.
///
/// Both figures are exposed side by side so callers can flag overtime and
/// undertime; `display_minutes` is only a convenience pick between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftHours {
    /// The shift the figures belong to.
    pub shift_id: String,
    /// The resolved work-session state.
    pub state: SessionState,
    /// Scheduled length; `None` when the shift interval is invalid.
    pub scheduled_minutes: Option<i64>,
    /// Clocked length; `None` unless the session is closed with a positive
    /// duration.
    pub worked_minutes: Option<i64>,
    /// Worked minutes when available, scheduled minutes otherwise.
    pub display_minutes: i64,
    /// Worked minus scheduled, when both are known.
    pub variance_minutes: Option<i64>,
    /// Interval problems found on the shift or its session.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RecordError>,
}

impl ShiftHours {
    /// Returns true if the shift has positive clocked time.
    pub fn has_worked_time(&self) -> bool {
        self.worked_minutes.is_some()
    }
}

/// Measures the scheduled and worked time of one shift.
///
/// Worked time is only taken from closed sessions carrying both clock
/// times. A session whose clock-out is not after its clock-in contributes
/// nothing and is reported as an invalid interval.
///
/// # Example
///
/// ```
/// use roster_engine::models::{Instant, ShiftRecord, WorkSession};
/// use roster_engine::payroll::shift_hours;
///
/// let mut session = WorkSession::new("ws_001", "shift_001");
/// session.clock_in_time = Instant::from_epoch_millis(1_746_435_600_000);  // 09:00Z
/// session.clock_out_time = Instant::from_epoch_millis(1_746_466_200_000); // 17:30Z
///
/// let shift = ShiftRecord {
///     id: "shift_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     start_time: Instant::from_epoch_millis(1_746_435_600_000).unwrap(),
///     end_time: Instant::from_epoch_millis(1_746_464_400_000).unwrap(),
///     position: String::new(),
///     work_session: Some(session),
/// };
///
/// let hours = shift_hours(&shift);
/// assert_eq!(hours.scheduled_minutes, Some(480));
/// assert_eq!(hours.worked_minutes, Some(510));
/// assert_eq!(hours.variance_minutes, Some(30));
/// ```
pub fn shift_hours(shift: &ShiftRecord) -> ShiftHours {
    let state = resolve_shift_state(shift);
    let mut errors = Vec::new();

    let scheduled_minutes = match shift.scheduled_minutes() {
        Ok(minutes) => Some(minutes),
        Err(err) => {
            errors.push(RecordError::new(&shift.id, &err));
            None
        }
    };

    let worked_minutes = if state.is_closed() {
        worked_minutes(shift, &mut errors)
    } else {
        None
    };

    let display_minutes = worked_minutes.or(scheduled_minutes).unwrap_or(0);
    let variance_minutes = match (worked_minutes, scheduled_minutes) {
        (Some(worked), Some(scheduled)) => Some(worked - scheduled),
        _ => None,
    };

    ShiftHours {
        shift_id: shift.id.clone(),
        state,
        scheduled_minutes,
        worked_minutes,
        display_minutes,
        variance_minutes,
        errors,
    }
}

fn worked_minutes(shift: &ShiftRecord, errors: &mut Vec<RecordError>) -> Option<i64> {
    let session = shift.work_session.as_ref()?;
    let (clock_in, clock_out) = (session.clock_in_time?, session.clock_out_time?);

    if clock_out <= clock_in {
        let err = EngineError::InvalidInterval {
            record_id: session.id.clone(),
            start: clock_in,
            end: clock_out,
        };
        errors.push(RecordError::new(&session.id, &err));
        return None;
    }

    // Sub-minute sessions truncate to zero
    Some(clock_in.minutes_until(clock_out)).filter(|minutes| *minutes > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Instant, WorkSession};
    use chrono::{DateTime, Utc};

    fn make_instant(iso: &str) -> Instant {
        Instant::from_datetime(iso.parse::<DateTime<Utc>>().unwrap())
    }

    fn make_shift(start: &str, end: &str, session: Option<WorkSession>) -> ShiftRecord {
        ShiftRecord {
            id: "shift_001".to_string(),
            employee_id: "emp_001".to_string(),
            start_time: make_instant(start),
            end_time: make_instant(end),
            position: "cook".to_string(),
            work_session: session,
        }
    }

    fn make_session(clock_in: Option<&str>, clock_out: Option<&str>) -> WorkSession {
        let mut session = WorkSession::new("ws_001", "shift_001");
        session.clock_in_time = clock_in.map(make_instant);
        session.clock_out_time = clock_out.map(make_instant);
        session
    }

    #[test]
    fn test_no_session_counts_scheduled_only() {
        let hours = shift_hours(&make_shift(
            "2025-05-05T09:00:00Z",
            "2025-05-05T17:00:00Z",
            None,
        ));
        assert_eq!(hours.state, SessionState::None);
        assert_eq!(hours.scheduled_minutes, Some(480));
        assert_eq!(hours.worked_minutes, None);
        assert_eq!(hours.display_minutes, 480);
        assert_eq!(hours.variance_minutes, None);
        assert!(hours.errors.is_empty());
    }

    #[test]
    fn test_open_session_has_no_worked_time() {
        let hours = shift_hours(&make_shift(
            "2025-05-05T09:00:00Z",
            "2025-05-05T17:00:00Z",
            Some(make_session(Some("2025-05-05T09:00:00Z"), None)),
        ));
        assert_eq!(hours.state, SessionState::Open);
        assert!(!hours.has_worked_time());
    }

    #[test]
    fn test_undertime_variance_is_negative() {
        let hours = shift_hours(&make_shift(
            "2025-05-05T09:00:00Z",
            "2025-05-05T17:00:00Z",
            Some(make_session(
                Some("2025-05-05T09:15:00Z"),
                Some("2025-05-05T16:00:00Z"),
            )),
        ));
        assert_eq!(hours.worked_minutes, Some(405));
        assert_eq!(hours.variance_minutes, Some(-75));
        assert_eq!(hours.display_minutes, 405);
    }

    #[test]
    fn test_inverted_session_is_reported_and_excluded() {
        let hours = shift_hours(&make_shift(
            "2025-05-05T09:00:00Z",
            "2025-05-05T17:00:00Z",
            Some(make_session(
                Some("2025-05-05T17:00:00Z"),
                Some("2025-05-05T09:00:00Z"),
            )),
        ));
        assert_eq!(hours.worked_minutes, None);
        assert_eq!(hours.display_minutes, 480);
        assert_eq!(hours.errors.len(), 1);
        assert_eq!(hours.errors[0].record_id, "ws_001");
        assert_eq!(hours.errors[0].code, "INVALID_INTERVAL");
    }

    #[test]
    fn test_zero_length_session_is_excluded() {
        let hours = shift_hours(&make_shift(
            "2025-05-05T09:00:00Z",
            "2025-05-05T17:00:00Z",
            Some(make_session(
                Some("2025-05-05T09:00:00Z"),
                Some("2025-05-05T09:00:00Z"),
            )),
        ));
        assert_eq!(hours.worked_minutes, None);
        assert_eq!(hours.errors.len(), 1);
    }

    #[test]
    fn test_inverted_shift_keeps_worked_time() {
        let hours = shift_hours(&make_shift(
            "2025-05-05T17:00:00Z",
            "2025-05-05T09:00:00Z",
            Some(make_session(
                Some("2025-05-05T09:00:00Z"),
                Some("2025-05-05T17:00:00Z"),
            )),
        ));
        assert_eq!(hours.scheduled_minutes, None);
        assert_eq!(hours.worked_minutes, Some(480));
        assert_eq!(hours.variance_minutes, None);
        assert_eq!(hours.errors[0].record_id, "shift_001");
    }

    #[test]
    fn test_confirmed_without_clock_times_has_no_worked_time() {
        let mut session = make_session(None, None);
        session.confirmed = Some(true);
        let hours = shift_hours(&make_shift(
            "2025-05-05T09:00:00Z",
            "2025-05-05T17:00:00Z",
            Some(session),
        ));
        assert_eq!(hours.state, SessionState::ClosedConfirmed);
        assert_eq!(hours.worked_minutes, None);
        assert!(hours.errors.is_empty());
    }
}
