//! Pure reducer for work-session events.
//!
//! [`apply_session_event`] takes a shift snapshot, the acting user and an
//! event, and returns the next work-session snapshot. Nothing is mutated in
//! place: on error the caller still holds the untouched original.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::{SessionState, resolve_shift_state};
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, Instant, ShiftRecord, WorkSession};

/// An event applied to a shift's work session.
///
/// Serialized with a `type` tag, e.g.
/// `{"type": "CONFIRM", "at": 1746468000000}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum SessionEvent {
    /// The employee clocks in. Opens a new session when the shift has none.
    ClockIn {
        /// ID for the session created by this clock-in.
        session_id: String,
        /// When the clock-in happened.
        at: Instant,
    },
    /// The employee clocks out.
    ClockOut {
        /// When the clock-out happened.
        at: Instant,
    },
    /// A manager confirms the recorded times.
    Confirm {
        /// When the confirmation was issued.
        at: Instant,
    },
    /// A manager edits the recorded times. Never confirms, and withdraws an
    /// existing confirmation when a clock time changes.
    Modify {
        /// Replacement clock-in time.
        #[serde(default)]
        clock_in_time: Option<Instant>,
        /// Replacement clock-out time.
        #[serde(default)]
        clock_out_time: Option<Instant>,
        /// Replacement note.
        #[serde(default)]
        note: Option<String>,
    },
    /// A manager edits the recorded times and confirms in one step.
    ModifyAndConfirm {
        /// Replacement clock-in time.
        #[serde(default)]
        clock_in_time: Option<Instant>,
        /// Replacement clock-out time.
        #[serde(default)]
        clock_out_time: Option<Instant>,
        /// Replacement note.
        #[serde(default)]
        note: Option<String>,
        /// When the confirmation was issued.
        at: Instant,
    },
}

impl SessionEvent {
    /// Returns the wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::ClockIn { .. } => "CLOCK_IN",
            SessionEvent::ClockOut { .. } => "CLOCK_OUT",
            SessionEvent::Confirm { .. } => "CONFIRM",
            SessionEvent::Modify { .. } => "MODIFY",
            SessionEvent::ModifyAndConfirm { .. } => "MODIFY_AND_CONFIRM",
        }
    }
}

/// Applies `event` to the work session of `shift` on behalf of `actor`.
///
/// Clock events may be issued by the shift's own employee or by a
/// manager/admin. Confirm and modify events require a manager/admin.
///
/// A modify that changes a clock time of a confirmed session clears
/// `confirmed`, `confirmed_by` and `confirmed_at`, so the new times must be
/// confirmed again before they count as final. A note-only modify keeps the
/// confirmation.
///
/// Confirmation backfills a missing clock-in from the shift's scheduled
/// start and a missing clock-out from its scheduled end. Backfill and
/// confirmation succeed or fail together.
///
/// # Errors
///
/// - [`EngineError::NotPermitted`] if the actor may not issue the event
/// - [`EngineError::MissingWorkSession`] for a non-clock-in event on a shift
///   without a session
/// - [`EngineError::InvalidTransition`] if the event does not apply to the
///   current state
/// - [`EngineError::InvalidInterval`] if a clock-out or modification would
///   end the session at or before its start
/// - [`EngineError::ConfirmationConflict`] if backfill cannot produce a
///   valid interval
///
/// # Example
///
/// ```
/// use roster_engine::models::{Actor, Instant, Role, ShiftRecord, WorkSession};
/// use roster_engine::session::{SessionEvent, SessionState, apply_session_event, resolve_session_state};
///
/// let mut session = WorkSession::new("ws_001", "shift_001");
/// session.clock_in_time = Instant::from_epoch_millis(1_746_435_600_000);
///
/// let shift = ShiftRecord {
///     id: "shift_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     start_time: Instant::from_epoch_millis(1_746_435_600_000).unwrap(),
///     end_time: Instant::from_epoch_millis(1_746_464_400_000).unwrap(),
///     position: "barista".to_string(),
///     work_session: Some(session),
/// };
/// let manager = Actor { id: "mgr_001".to_string(), role: Role::Manager };
///
/// // The missing clock-out is taken from the scheduled end.
/// let at = Instant::from_epoch_millis(1_746_468_000_000).unwrap();
/// let confirmed = apply_session_event(&shift, &manager, &SessionEvent::Confirm { at }).unwrap();
/// assert_eq!(resolve_session_state(Some(&confirmed)), SessionState::ClosedConfirmed);
/// assert_eq!(confirmed.clock_out_time, Some(shift.end_time));
/// assert_eq!(confirmed.confirmed_by.as_deref(), Some("mgr_001"));
/// ```
pub fn apply_session_event(
    shift: &ShiftRecord,
    actor: &Actor,
    event: &SessionEvent,
) -> EngineResult<WorkSession> {
    let state = resolve_shift_state(shift);
    debug!(
        shift_id = %shift.id,
        actor_id = %actor.id,
        state = %state,
        event = event.name(),
        "Applying work session event"
    );

    match event {
        SessionEvent::ClockIn { session_id, at } => {
            ensure_clock_permitted(shift, actor, "clock in")?;
            expect_state(state, &[SessionState::None], event)?;
            let mut next = shift
                .work_session
                .clone()
                .unwrap_or_else(|| WorkSession::new(session_id.clone(), shift.id.clone()));
            next.clock_in_time = Some(*at);
            Ok(next)
        }
        SessionEvent::ClockOut { at } => {
            ensure_clock_permitted(shift, actor, "clock out")?;
            let mut next = existing_session(shift)?;
            expect_state(state, &[SessionState::Open], event)?;
            next.clock_out_time = Some(*at);
            check_session_interval(&next)?;
            Ok(next)
        }
        SessionEvent::Confirm { at } => {
            ensure_manager(actor, "confirm work sessions")?;
            let next = existing_session(shift)?;
            expect_state(
                state,
                &[
                    SessionState::None,
                    SessionState::Open,
                    SessionState::ClosedUnconfirmed,
                ],
                event,
            )?;
            confirm(shift, next, actor, *at)
        }
        SessionEvent::Modify {
            clock_in_time,
            clock_out_time,
            note,
        } => {
            ensure_manager(actor, "modify work sessions")?;
            let mut next = existing_session(shift)?;
            let times_changed = patch(&mut next, *clock_in_time, *clock_out_time, note.as_deref());
            check_session_interval(&next)?;
            if times_changed && next.confirmed.is_some() {
                debug!(session_id = %next.id, "Clock times changed, withdrawing confirmation");
                next.confirmed = None;
                next.confirmed_by = None;
                next.confirmed_at = None;
            }
            Ok(next)
        }
        SessionEvent::ModifyAndConfirm {
            clock_in_time,
            clock_out_time,
            note,
            at,
        } => {
            ensure_manager(actor, "modify and confirm work sessions")?;
            let mut next = existing_session(shift)?;
            patch(&mut next, *clock_in_time, *clock_out_time, note.as_deref());
            check_session_interval(&next)?;
            confirm(shift, next, actor, *at)
        }
    }
}

/// Returns true if confirming the shift's session would backfill at least
/// one clock time from the schedule.
pub fn needs_backfill(shift: &ShiftRecord) -> bool {
    shift
        .work_session
        .as_ref()
        .is_some_and(|session| session.clock_in_time.is_none() || session.clock_out_time.is_none())
}

fn confirm(
    shift: &ShiftRecord,
    mut session: WorkSession,
    actor: &Actor,
    at: Instant,
) -> EngineResult<WorkSession> {
    if session.clock_in_time.is_none() || session.clock_out_time.is_none() {
        if !shift.has_valid_interval() {
            return Err(EngineError::ConfirmationConflict {
                session_id: session.id,
                message: format!(
                    "missing clock times cannot be taken from shift '{}' which ends at {} before its start {}",
                    shift.id, shift.end_time, shift.start_time
                ),
            });
        }
        debug!(session_id = %session.id, shift_id = %shift.id, "Backfilling clock times from schedule");
        session.clock_in_time.get_or_insert(shift.start_time);
        session.clock_out_time.get_or_insert(shift.end_time);
    }

    if let (Some(clock_in), Some(clock_out)) = (session.clock_in_time, session.clock_out_time) {
        if clock_out <= clock_in {
            return Err(EngineError::ConfirmationConflict {
                session_id: session.id,
                message: format!("clock-out {} is not after clock-in {}", clock_out, clock_in),
            });
        }
    }

    session.confirmed = Some(true);
    session.confirmed_by = Some(actor.id.clone());
    session.confirmed_at = Some(at);
    Ok(session)
}

/// Applies the given fields and returns true if a clock time changed.
fn patch(
    session: &mut WorkSession,
    clock_in_time: Option<Instant>,
    clock_out_time: Option<Instant>,
    note: Option<&str>,
) -> bool {
    let before = (session.clock_in_time, session.clock_out_time);
    if let Some(clock_in) = clock_in_time {
        session.clock_in_time = Some(clock_in);
    }
    if let Some(clock_out) = clock_out_time {
        session.clock_out_time = Some(clock_out);
    }
    if let Some(note) = note {
        session.note = Some(note.to_string());
    }
    before != (session.clock_in_time, session.clock_out_time)
}

fn existing_session(shift: &ShiftRecord) -> EngineResult<WorkSession> {
    shift
        .work_session
        .clone()
        .ok_or_else(|| EngineError::MissingWorkSession {
            shift_id: shift.id.clone(),
        })
}

fn check_session_interval(session: &WorkSession) -> EngineResult<()> {
    match (session.clock_in_time, session.clock_out_time) {
        (Some(start), Some(end)) if end <= start => Err(EngineError::InvalidInterval {
            record_id: session.id.clone(),
            start,
            end,
        }),
        _ => Ok(()),
    }
}

fn expect_state(
    state: SessionState,
    allowed: &[SessionState],
    event: &SessionEvent,
) -> EngineResult<()> {
    if allowed.contains(&state) {
        Ok(())
    } else {
        Err(EngineError::InvalidTransition {
            state,
            event: event.name().to_string(),
        })
    }
}

fn ensure_clock_permitted(shift: &ShiftRecord, actor: &Actor, action: &str) -> EngineResult<()> {
    if actor.role.can_manage_sessions() || actor.id == shift.employee_id {
        Ok(())
    } else {
        Err(not_permitted(actor, action))
    }
}

fn ensure_manager(actor: &Actor, action: &str) -> EngineResult<()> {
    if actor.role.can_manage_sessions() {
        Ok(())
    } else {
        Err(not_permitted(actor, action))
    }
}

fn not_permitted(actor: &Actor, action: &str) -> EngineError {
    EngineError::NotPermitted {
        actor_id: actor.id.clone(),
        role: actor.role,
        action: action.to_string(),
    }
}
