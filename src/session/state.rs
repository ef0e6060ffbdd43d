//! Work-session state resolution.
//!
//! The single place that decides what a work-session snapshot means.
//! `confirmed == Some(true)` is the only thing that counts as confirmation;
//! a missing flag is unconfirmed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ShiftRecord, WorkSession};

/// The lifecycle state of a shift's work session.
///
/// # Example
///
/// ```
/// use roster_engine::session::SessionState;
///
/// assert_eq!(
///     serde_json::to_string(&SessionState::ClosedUnconfirmed).unwrap(),
///     "\"CLOSED_UNCONFIRMED\""
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// No clock-in has been recorded.
    None,
    /// Clocked in, not yet clocked out.
    Open,
    /// Clocked in and out, awaiting confirmation.
    ClosedUnconfirmed,
    /// Confirmed by a manager or admin.
    ClosedConfirmed,
}

impl SessionState {
    /// Returns true for both closed states.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            SessionState::ClosedUnconfirmed | SessionState::ClosedConfirmed
        )
    }

    /// Returns true if the session has been confirmed.
    pub fn is_confirmed(self) -> bool {
        self == SessionState::ClosedConfirmed
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::None => write!(f, "NONE"),
            SessionState::Open => write!(f, "OPEN"),
            SessionState::ClosedUnconfirmed => write!(f, "CLOSED_UNCONFIRMED"),
            SessionState::ClosedConfirmed => write!(f, "CLOSED_CONFIRMED"),
        }
    }
}

/// Resolves the state of a work-session snapshot.
///
/// - no session, or a session without a clock-in: [`SessionState::None`]
/// - `confirmed == Some(true)`: [`SessionState::ClosedConfirmed`]
/// - clock-in without clock-out: [`SessionState::Open`]
/// - both clock times: [`SessionState::ClosedUnconfirmed`]
///
/// # Example
///
/// ```
/// use roster_engine::models::{Instant, WorkSession};
/// use roster_engine::session::{SessionState, resolve_session_state};
///
/// let mut session = WorkSession::new("ws_001", "shift_001");
/// session.clock_in_time = Instant::from_epoch_millis(1_746_435_600_000);
/// session.clock_out_time = Instant::from_epoch_millis(1_746_464_400_000);
///
/// // No `confirmed` field at all is never read as approval.
/// assert_eq!(resolve_session_state(Some(&session)), SessionState::ClosedUnconfirmed);
///
/// session.confirmed = Some(true);
/// assert_eq!(resolve_session_state(Some(&session)), SessionState::ClosedConfirmed);
/// ```
pub fn resolve_session_state(session: Option<&WorkSession>) -> SessionState {
    let Some(session) = session else {
        return SessionState::None;
    };

    if session.confirmed == Some(true) {
        return SessionState::ClosedConfirmed;
    }

    match (session.clock_in_time, session.clock_out_time) {
        (Some(_), Some(_)) => SessionState::ClosedUnconfirmed,
        (Some(_), None) => SessionState::Open,
        (None, _) => SessionState::None,
    }
}

/// Resolves the state of a shift's work session.
pub fn resolve_shift_state(shift: &ShiftRecord) -> SessionState {
    resolve_session_state(shift.work_session.as_ref())
}
