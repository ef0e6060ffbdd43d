//! Shift-exchange evaluation and approval gating.
//!
//! A swap moves each side's shift to the other employee; a take-over moves
//! the requester's shift to the counterpart. Every incoming shift is checked
//! against the receiving employee's schedule, minus the shift that employee
//! gives away in the same exchange.

use chrono::{Days, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::conflict::{ShiftConflict, find_conflicts};
use crate::calendar::week_start;
use crate::models::{Calendar, ExchangeKind, ExchangeRequest, ShiftRecord};

/// The outcome of the conflict check.
///
/// `Unknown` is its own answer and never reads as `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictStatus {
    /// At least one incoming shift overlaps the receiver's schedule.
    Conflict,
    /// No overlap was found on complete, valid data.
    Clear,
    /// The schedule or a relevant interval is missing or invalid.
    Unknown,
}

/// Why approval is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisabledReason {
    /// The backend reported the exchange cannot be executed.
    ExecutionNotPossible,
    /// An incoming shift overlaps the receiver's schedule.
    ConflictDetected,
    /// The conflict check could not reach a verdict.
    ConflictUnknown,
    /// The backend did not report whether the exchange can be executed.
    ExecutionUnknown,
}

/// Whether the approve action should be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalAction {
    /// Approval may be submitted.
    Enabled,
    /// Approval must be shown disabled.
    Disabled {
        /// The first blocking reason.
        reason: DisabledReason,
    },
}

impl ApprovalAction {
    /// Returns true if approval may be submitted.
    pub fn is_enabled(&self) -> bool {
        matches!(self, ApprovalAction::Enabled)
    }
}

/// The verdict on an exchange request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeEvaluation {
    /// The evaluated request.
    pub request_id: String,
    /// The conflict check outcome.
    pub status: ConflictStatus,
    /// Every overlap found.
    pub conflicts: Vec<ShiftConflict>,
    /// Whether approval should be offered.
    pub approval: ApprovalAction,
}

struct Transfer<'a> {
    incoming: &'a ShiftRecord,
    receiver_id: &'a str,
    outgoing_id: Option<&'a str>,
}

/// Evaluates an exchange request against the current schedule.
///
/// `schedule` holds the shifts of the employees involved; `None` means the
/// schedule could not be obtained, which yields [`ConflictStatus::Unknown`].
/// The schedule is narrowed to shifts whose interval touches the Monday-start
/// weeks around each incoming shift, so a long shift that began weeks earlier
/// is still checked.
///
/// Approval is enabled only when the backend reported
/// `is_execution_possible == Some(true)` and the status is
/// [`ConflictStatus::Clear`].
///
/// # Example
///
/// ```
/// use roster_engine::exchange::{ConflictStatus, evaluate_exchange};
/// use roster_engine::models::{Calendar, ExchangeKind, ExchangeRequest, Instant, ShiftRecord};
///
/// let hour = 3_600_000;
/// let day = 1_746_403_200_000; // 2025-05-05T00:00Z
/// let shift = |id: &str, employee: &str, from: i64, to: i64| ShiftRecord {
///     id: id.to_string(),
///     employee_id: employee.to_string(),
///     start_time: Instant::from_epoch_millis(day + from * hour).unwrap(),
///     end_time: Instant::from_epoch_millis(day + to * hour).unwrap(),
///     position: String::new(),
///     work_session: None,
/// };
///
/// let request = ExchangeRequest {
///     id: "ex_001".to_string(),
///     kind: ExchangeKind::TakeOver,
///     requester_id: "emp_001".to_string(),
///     requester_shift: shift("s1", "emp_001", 9, 17),
///     counterpart_id: "emp_002".to_string(),
///     counterpart_shift: None,
///     is_execution_possible: Some(true),
/// };
/// let schedule = vec![shift("s2", "emp_002", 17, 21)];
///
/// let evaluation = evaluate_exchange(&request, Some(schedule.as_slice()), &Calendar::utc());
/// assert_eq!(evaluation.status, ConflictStatus::Clear);
/// assert!(evaluation.approval.is_enabled());
///
/// let evaluation = evaluate_exchange(&request, None, &Calendar::utc());
/// assert_eq!(evaluation.status, ConflictStatus::Unknown);
/// assert!(!evaluation.approval.is_enabled());
/// ```
pub fn evaluate_exchange(
    request: &ExchangeRequest,
    schedule: Option<&[ShiftRecord]>,
    calendar: &Calendar,
) -> ExchangeEvaluation {
    let (status, conflicts) = match (schedule, transfers(request)) {
        (Some(schedule), Some(transfers)) => check_transfers(&transfers, schedule, calendar),
        _ => (ConflictStatus::Unknown, Vec::new()),
    };

    let approval = approval_for(request.is_execution_possible, status);
    debug!(
        request_id = %request.id,
        kind = ?request.kind,
        status = ?status,
        conflicts = conflicts.len(),
        approval = ?approval,
        "Evaluated shift exchange"
    );

    ExchangeEvaluation {
        request_id: request.id.clone(),
        status,
        conflicts,
        approval,
    }
}

fn transfers(request: &ExchangeRequest) -> Option<Vec<Transfer<'_>>> {
    match request.kind {
        ExchangeKind::TakeOver => Some(vec![Transfer {
            incoming: &request.requester_shift,
            receiver_id: &request.counterpart_id,
            outgoing_id: None,
        }]),
        ExchangeKind::Swap => {
            let counterpart_shift = request.counterpart_shift.as_ref()?;
            Some(vec![
                Transfer {
                    incoming: &request.requester_shift,
                    receiver_id: &request.counterpart_id,
                    outgoing_id: Some(&counterpart_shift.id),
                },
                Transfer {
                    incoming: counterpart_shift,
                    receiver_id: &request.requester_id,
                    outgoing_id: Some(&request.requester_shift.id),
                },
            ])
        }
    }
}

fn check_transfers(
    transfers: &[Transfer<'_>],
    schedule: &[ShiftRecord],
    calendar: &Calendar,
) -> (ConflictStatus, Vec<ShiftConflict>) {
    let mut conflicts = Vec::new();
    let mut undecidable = false;

    for transfer in transfers {
        if !transfer.incoming.has_valid_interval() {
            undecidable = true;
            continue;
        }

        let receiver_shifts: Vec<ShiftRecord> = schedule
            .iter()
            .filter(|shift| shift.employee_id == transfer.receiver_id)
            .filter(|shift| Some(shift.id.as_str()) != transfer.outgoing_id)
            .filter(|shift| shift.id != transfer.incoming.id)
            .cloned()
            .collect();
        let nearby = narrow_to_weeks(&receiver_shifts, transfer.incoming, calendar);

        if nearby.iter().any(|shift| !shift.has_valid_interval()) {
            undecidable = true;
        }
        conflicts.extend(find_conflicts(transfer.incoming, &nearby));
    }

    let status = if !conflicts.is_empty() {
        ConflictStatus::Conflict
    } else if undecidable {
        ConflictStatus::Unknown
    } else {
        ConflictStatus::Clear
    };
    (status, conflicts)
}

/// Keeps the shifts whose interval touches the weeks from the one before
/// `incoming` starts to the one after it ends. Inverted intervals are compared
/// by their earlier and later endpoints so they are still reported.
fn narrow_to_weeks(
    shifts: &[ShiftRecord],
    incoming: &ShiftRecord,
    calendar: &Calendar,
) -> Vec<ShiftRecord> {
    let first_week = week_start(incoming.start_time.local_date(calendar));
    let last_week = week_start(incoming.end_time.local_date(calendar));
    let window_start = first_week
        .checked_sub_days(Days::new(7))
        .and_then(|day| calendar.instant_from_local(day.and_time(NaiveTime::MIN)));
    let window_end = last_week
        .checked_add_days(Days::new(7))
        .and_then(|day| calendar.instant_from_local(day.and_time(NaiveTime::MIN)));

    let (Some(window_start), Some(window_end)) = (window_start, window_end) else {
        return shifts.to_vec();
    };

    shifts
        .iter()
        .filter(|shift| {
            let earlier = shift.start_time.min(shift.end_time);
            let later = shift.start_time.max(shift.end_time);
            earlier < window_end && later > window_start
        })
        .cloned()
        .collect()
}

fn approval_for(is_execution_possible: Option<bool>, status: ConflictStatus) -> ApprovalAction {
    let reason = match (is_execution_possible, status) {
        (Some(true), ConflictStatus::Clear) => return ApprovalAction::Enabled,
        (Some(false), _) => DisabledReason::ExecutionNotPossible,
        (_, ConflictStatus::Conflict) => DisabledReason::ConflictDetected,
        (_, ConflictStatus::Unknown) => DisabledReason::ConflictUnknown,
        (None, ConflictStatus::Clear) => DisabledReason::ExecutionUnknown,
    };
    ApprovalAction::Disabled { reason }
}
