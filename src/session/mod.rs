//! Work-session lifecycle.
//!
//! This module resolves the confirmation state of a work session from its
//! snapshot, applies session events through a pure reducer, and reports
//! which actions a caller may offer for a given shift.

mod actions;
mod reducer;
mod state;

pub use actions::{PermittedActions, permitted_actions};
pub use reducer::{SessionEvent, apply_session_event, needs_backfill};
pub use state::{SessionState, resolve_session_state, resolve_shift_state};
