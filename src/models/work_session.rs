//! Work session model and its wire form.
//!
//! A work session is the actual clock-in/clock-out record tied to a shift.
//! Its lifecycle state is derived by [`crate::session::resolve_session_state`],
//! never stored.

use serde::{Deserialize, Serialize};

use super::{Instant, RawTimestamp};

/// The clock-in/clock-out record of a shift.
///
/// `confirmed` is kept as an `Option` because some backends omit the field
/// entirely; an absent value never counts as confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    /// Unique identifier for the work session.
    pub id: String,
    /// The shift this session belongs to.
    pub shift_id: String,
    /// When the employee clocked in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_in_time: Option<Instant>,
    /// When the employee clocked out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_out_time: Option<Instant>,
    /// Managerial confirmation flag as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    /// Who confirmed the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_by: Option<String>,
    /// When the session was confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<Instant>,
    /// Free-form note attached by the employee or a manager.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WorkSession {
    /// Creates an empty session for a shift.
    pub fn new(id: impl Into<String>, shift_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shift_id: shift_id.into(),
            clock_in_time: None,
            clock_out_time: None,
            confirmed: None,
            confirmed_by: None,
            confirmed_at: None,
            note: None,
        }
    }
}

/// A work session as received from the time-clock backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWorkSession {
    /// Unique identifier for the work session.
    pub id: String,
    /// The shift this session belongs to.
    pub shift_id: String,
    /// When the employee clocked in, in any supported encoding.
    #[serde(default)]
    pub clock_in_time: Option<RawTimestamp>,
    /// When the employee clocked out, in any supported encoding.
    #[serde(default)]
    pub clock_out_time: Option<RawTimestamp>,
    /// Managerial confirmation flag, if the backend sends one.
    #[serde(default)]
    pub confirmed: Option<bool>,
    /// Who confirmed the session.
    #[serde(default)]
    pub confirmed_by: Option<String>,
    /// When the session was confirmed, in any supported encoding.
    #[serde(default)]
    pub confirmed_at: Option<RawTimestamp>,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}
