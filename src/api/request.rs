//! Request types for the roster engine API.
//!
//! Shift payloads arrive in their wire form ([`RawShiftRecord`]) and are
//! normalized by the handlers with the configured calendar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Actor, EmployeeRateProfile, Instant, RawExchangeRequest, RawShiftRecord};
use crate::payroll::PayrollBasis;
use crate::session::SessionEvent;

/// Request body for the `/normalize` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeRequest {
    /// The shifts to normalize.
    pub shifts: Vec<RawShiftRecord>,
    /// The caller's current time, used only by the legacy fallback mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<Instant>,
}

/// Request body for the `/calendar/weeks` and `/calendar/months` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRequest {
    /// The shifts to bucket.
    pub shifts: Vec<RawShiftRecord>,
    /// When set on `/calendar/weeks`, also return the seven-day view of the
    /// week starting on this Monday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start: Option<NaiveDate>,
}

/// Request body for the `/calendar/month` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGridRequest {
    /// The target year.
    pub year: i32,
    /// The target month (1-based).
    pub month: u32,
    /// The shifts to place on the grid.
    pub shifts: Vec<RawShiftRecord>,
}

/// Request body for the `/payroll/summary` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRequest {
    /// The employee's rate profile.
    pub rate: EmployeeRateProfile,
    /// The shifts to summarize.
    pub shifts: Vec<RawShiftRecord>,
    /// Overrides the configured payroll basis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<PayrollBasis>,
}

/// Request body for the `/work-sessions/transition` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// The shift whose work session changes, with its current session.
    pub shift: RawShiftRecord,
    /// The user issuing the event.
    pub actor: Actor,
    /// The event to apply.
    pub event: SessionEvent,
}

/// Request body for the `/work-sessions/actions` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsRequest {
    /// The shift to inspect, with its current session.
    pub shift: RawShiftRecord,
    /// The user the actions are computed for.
    pub actor: Actor,
}

/// Request body for the `/exchange/evaluate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeEvaluationRequest {
    /// The swap or take-over request.
    pub request: RawExchangeRequest,
    /// The shifts of the employees involved; absent when unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<RawShiftRecord>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExchangeKind, RawTimestamp, Role};

    #[test]
    fn test_deserialize_payroll_request() {
        let json = r#"{
            "rate": {
                "employeeId": "emp_001",
                "hourlyRate": "20.00",
                "breakDurationMinutesPerShift": 30
            },
            "shifts": [
                {
                    "id": "shift_001",
                    "employeeId": "emp_001",
                    "startTime": "2025-05-05T09:00:00Z",
                    "endTime": 1746464400000,
                    "position": "barista"
                }
            ]
        }"#;

        let request: PayrollRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.rate.break_duration_minutes_per_shift, 30);
        assert_eq!(request.shifts.len(), 1);
        assert!(matches!(request.shifts[0].start_time, RawTimestamp::Text(_)));
        assert!(matches!(
            request.shifts[0].end_time,
            RawTimestamp::Numeric(1_746_464_400_000)
        ));
        assert!(request.basis.is_none());
    }

    #[test]
    fn test_deserialize_transition_request() {
        let json = r#"{
            "shift": {
                "id": "shift_001",
                "employeeId": "emp_001",
                "startTime": [2025, 5, 5, 9],
                "endTime": [2025, 5, 5, 17],
                "workSession": {
                    "id": "ws_001",
                    "shiftId": "shift_001",
                    "clockInTime": "1746435600"
                }
            },
            "actor": { "id": "mgr_001", "role": "MANAGER" },
            "event": { "type": "CONFIRM", "at": 1746468000000 }
        }"#;

        let request: TransitionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.actor.role, Role::Manager);
        assert_eq!(request.event.name(), "CONFIRM");
        assert!(request.shift.work_session.is_some());
    }

    #[test]
    fn test_deserialize_exchange_request_without_schedule() {
        let json = r#"{
            "request": {
                "id": "ex_001",
                "kind": "SWAP",
                "requesterId": "emp_001",
                "requesterShift": {
                    "id": "s1",
                    "employeeId": "emp_001",
                    "startTime": 1746435600000,
                    "endTime": 1746464400000
                },
                "counterpartId": "emp_002",
                "isExecutionPossible": true
            }
        }"#;

        let request: ExchangeEvaluationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.request.kind, ExchangeKind::Swap);
        assert!(request.request.counterpart_shift.is_none());
        assert!(request.schedule.is_none());
    }

    #[test]
    fn test_bucket_request_week_start_is_optional() {
        let request: BucketRequest = serde_json::from_str(r#"{"shifts": []}"#).unwrap();
        assert!(request.week_start.is_none());

        let request: BucketRequest =
            serde_json::from_str(r#"{"shifts": [], "weekStart": "2025-05-05"}"#).unwrap();
        assert_eq!(
            request.week_start,
            NaiveDate::from_ymd_opt(2025, 5, 5)
        );
    }
}
