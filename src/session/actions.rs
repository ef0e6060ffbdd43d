//! Which work-session actions a caller may surface.
//!
//! The engine does not enforce visibility; it reports what
//! [`super::apply_session_event`] would accept so the caller can disable the
//! rest instead of failing on submit.

use serde::{Deserialize, Serialize};

use super::reducer::needs_backfill;
use super::state::{SessionState, resolve_shift_state};
use crate::models::{Actor, ShiftRecord};

/// The actions an actor may take on a shift's work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermittedActions {
    /// The resolved state the answer is based on.
    pub state: SessionState,
    /// A clock-in would be accepted.
    pub can_clock_in: bool,
    /// A clock-out would be accepted.
    pub can_clock_out: bool,
    /// A plain confirmation would be accepted.
    pub can_confirm: bool,
    /// A modification (with or without confirmation) would be accepted.
    pub can_modify: bool,
    /// Confirming would fill missing clock times from the schedule.
    pub needs_backfill: bool,
}

/// Reports the actions `actor` may take on the work session of `shift`.
///
/// # Example
///
/// ```
/// use roster_engine::models::{Actor, Instant, Role, ShiftRecord};
/// use roster_engine::session::permitted_actions;
///
/// let shift = ShiftRecord {
///     id: "shift_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     start_time: Instant::from_epoch_millis(1_746_435_600_000).unwrap(),
///     end_time: Instant::from_epoch_millis(1_746_464_400_000).unwrap(),
///     position: String::new(),
///     work_session: None,
/// };
///
/// let owner = Actor { id: "emp_001".to_string(), role: Role::Employee };
/// let actions = permitted_actions(&shift, &owner);
/// assert!(actions.can_clock_in);
/// assert!(!actions.can_confirm);
/// ```
pub fn permitted_actions(shift: &ShiftRecord, actor: &Actor) -> PermittedActions {
    let state = resolve_shift_state(shift);
    let is_manager = actor.role.can_manage_sessions();
    let may_clock = is_manager || actor.id == shift.employee_id;
    let has_session = shift.work_session.is_some();

    let can_confirm = is_manager && has_session && !state.is_confirmed();

    PermittedActions {
        state,
        can_clock_in: may_clock && state == SessionState::None,
        can_clock_out: may_clock && state == SessionState::Open,
        can_confirm,
        can_modify: is_manager && has_session,
        needs_backfill: can_confirm && needs_backfill(shift),
    }
}
