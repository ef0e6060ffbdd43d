//! Shift-exchange request model.

use serde::{Deserialize, Serialize};

use super::{RawShiftRecord, ShiftRecord};

/// The kind of shift exchange being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeKind {
    /// Requester and counterpart trade shifts.
    Swap,
    /// The counterpart takes over the requester's shift.
    TakeOver,
}

/// A request to swap or hand over a shift, pending managerial approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// Swap or take-over.
    pub kind: ExchangeKind,
    /// The employee who opened the request.
    pub requester_id: String,
    /// The requester's shift that changes hands.
    pub requester_shift: ShiftRecord,
    /// The employee on the other side of the exchange.
    pub counterpart_id: String,
    /// The counterpart's shift, required for swaps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart_shift: Option<ShiftRecord>,
    /// The backend's own verdict; `None` when it did not report one.
    #[serde(default)]
    pub is_execution_possible: Option<bool>,
}

/// An exchange request as received from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExchangeRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// Swap or take-over.
    pub kind: ExchangeKind,
    /// The employee who opened the request.
    pub requester_id: String,
    /// The requester's shift that changes hands.
    pub requester_shift: RawShiftRecord,
    /// The employee on the other side of the exchange.
    pub counterpart_id: String,
    /// The counterpart's shift, required for swaps.
    #[serde(default)]
    pub counterpart_shift: Option<RawShiftRecord>,
    /// The backend's own verdict.
    #[serde(default)]
    pub is_execution_possible: Option<bool>,
}
