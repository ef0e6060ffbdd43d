//! Shift-exchange conflict evaluation.
//!
//! This module detects overlaps between shifts and decides whether a swap
//! or take-over request may be approved.

mod conflict;
mod evaluate;

pub use conflict::{ShiftConflict, find_conflicts, has_conflict};
pub use evaluate::{
    ApprovalAction, ConflictStatus, DisabledReason, ExchangeEvaluation, evaluate_exchange,
};
