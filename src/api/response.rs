//! Response types for the roster engine API.
//!
//! This module defines the success bodies that wrap engine results with
//! their per-record errors, and the error response structures for the
//! HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarBucket, MonthGrid, WeekView};
use crate::error::EngineError;
use crate::models::WorkSession;
use crate::normalize::RecordError;
use crate::session::{PermittedActions, SessionState};

/// Response body for the bucket endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketResponse {
    /// The buckets, ascending by period key.
    pub buckets: Vec<CalendarBucket>,
    /// The requested single-week view, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_view: Option<WeekView>,
    /// Records skipped because their timestamps failed to decode.
    pub errors: Vec<RecordError>,
}

/// Response body for the `/calendar/month` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGridResponse {
    /// The 6×7 month grid.
    pub grid: MonthGrid,
    /// Records skipped because their timestamps failed to decode.
    pub errors: Vec<RecordError>,
}

/// Response body for the `/work-sessions/transition` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    /// The new work-session snapshot.
    pub work_session: WorkSession,
    /// The state of the new snapshot.
    pub state: SessionState,
    /// The actions the same actor may take next.
    pub permitted_actions: PermittedActions,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let (status, details) = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The engine configuration could not be loaded",
            ),
            EngineError::InvalidTimestamp { .. } => (
                StatusCode::BAD_REQUEST,
                "Timestamps must be epoch seconds or milliseconds, numeric strings, ISO-8601 strings or [y, m, d, h, mi, s] arrays",
            ),
            EngineError::InvalidInterval { .. } => (
                StatusCode::BAD_REQUEST,
                "The end of a shift or work session must be after its start",
            ),
            EngineError::InvalidCalendarMonth { .. } => (
                StatusCode::BAD_REQUEST,
                "Month must be between 1 and 12",
            ),
            EngineError::InvalidRate { .. } => (
                StatusCode::BAD_REQUEST,
                "The hourly rate must be non-negative and small enough to price the payable time",
            ),
            EngineError::MissingWorkSession { .. } => (
                StatusCode::BAD_REQUEST,
                "Only a clock-in can be applied to a shift without a work session",
            ),
            EngineError::NotPermitted { .. } => (
                StatusCode::FORBIDDEN,
                "Confirming and modifying work sessions requires the MANAGER or ADMIN role",
            ),
            EngineError::InvalidTransition { .. } => (
                StatusCode::CONFLICT,
                "The event does not apply to the work session's current state",
            ),
            EngineError::ConfirmationConflict { .. } => (
                StatusCode::CONFLICT,
                "The confirmation was not applied; the work session is unchanged",
            ),
        };

        ApiErrorResponse {
            status,
            error: ApiError::with_details(error.code(), error.to_string(), details),
        }
    }
}
