//! Error types for the Roster Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while normalizing, bucketing and
//! computing schedule data.

use thiserror::Error;

use crate::models::{Instant, Role};
use crate::session::SessionState;

/// The main error type for the Roster Engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use roster_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or holds invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A timestamp matched none of the recognized wire encodings.
    #[error("Invalid timestamp '{raw}': {reason}")]
    InvalidTimestamp {
        /// The raw value as received.
        raw: String,
        /// Why the value could not be decoded.
        reason: String,
    },

    /// A shift or work session ends at or before it starts.
    #[error("Invalid interval on '{record_id}': end {end} is not after start {start}")]
    InvalidInterval {
        /// The ID of the shift or work session.
        record_id: String,
        /// The recorded start.
        start: Instant,
        /// The recorded end.
        end: Instant,
    },

    /// Confirmation could not be applied as a whole.
    #[error("Cannot confirm work session '{session_id}': {message}")]
    ConfirmationConflict {
        /// The ID of the work session.
        session_id: String,
        /// A description of what blocked the confirmation.
        message: String,
    },

    /// The event does not apply to the session's current state.
    #[error("Cannot apply '{event}' to work session in state {state}")]
    InvalidTransition {
        /// The state the session was in.
        state: SessionState,
        /// The name of the rejected event.
        event: String,
    },

    /// A session event was issued for a shift without a work session.
    #[error("Shift '{shift_id}' has no work session")]
    MissingWorkSession {
        /// The ID of the shift.
        shift_id: String,
    },

    /// The actor's role does not allow the requested action.
    #[error("Actor '{actor_id}' with role {role} may not {action}")]
    NotPermitted {
        /// The ID of the actor.
        actor_id: String,
        /// The actor's role.
        role: Role,
        /// The action that was refused.
        action: String,
    },

    /// An hourly rate that is negative or overflows when applied to the
    /// payable time.
    #[error("Invalid hourly rate for '{employee_id}': {message}")]
    InvalidRate {
        /// The employee the rate belongs to.
        employee_id: String,
        /// A description of the problem.
        message: String,
    },

    /// A calendar month outside 1..=12 or an unrepresentable year.
    #[error("Invalid calendar month {year}-{month}")]
    InvalidCalendarMonth {
        /// The requested year.
        year: i32,
        /// The requested month (1-based).
        month: u32,
    },
}

impl EngineError {
    /// Returns a stable, machine-readable code for this error.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_engine::error::EngineError;
    ///
    /// let error = EngineError::InvalidTimestamp {
    ///     raw: "yesterday".to_string(),
    ///     reason: "not an ISO-8601 date-time".to_string(),
    /// };
    /// assert_eq!(error.code(), "INVALID_TIMESTAMP");
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
            EngineError::InvalidInterval { .. } => "INVALID_INTERVAL",
            EngineError::ConfirmationConflict { .. } => "CONFIRMATION_CONFLICT",
            EngineError::InvalidTransition { .. } => "INVALID_TRANSITION",
            EngineError::MissingWorkSession { .. } => "MISSING_WORK_SESSION",
            EngineError::NotPermitted { .. } => "NOT_PERMITTED",
            EngineError::InvalidRate { .. } => "INVALID_RATE",
            EngineError::InvalidCalendarMonth { .. } => "INVALID_CALENDAR_MONTH",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/engine.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/engine.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_timestamp_displays_raw_and_reason() {
        let error = EngineError::InvalidTimestamp {
            raw: "not-a-date".to_string(),
            reason: "not an ISO-8601 date-time".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid timestamp 'not-a-date': not an ISO-8601 date-time"
        );
    }

    #[test]
    fn test_invalid_interval_displays_instants() {
        let error = EngineError::InvalidInterval {
            record_id: "shift_001".to_string(),
            start: Instant::from_epoch_millis(1_746_421_200_000).unwrap(),
            end: Instant::from_epoch_millis(1_746_421_200_000).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid interval on 'shift_001': end 2025-05-05T05:00:00.000Z is not after start 2025-05-05T05:00:00.000Z"
        );
    }

    #[test]
    fn test_invalid_transition_displays_state() {
        let error = EngineError::InvalidTransition {
            state: SessionState::ClosedConfirmed,
            event: "confirm".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot apply 'confirm' to work session in state CLOSED_CONFIRMED"
        );
    }

    #[test]
    fn test_not_permitted_displays_role() {
        let error = EngineError::NotPermitted {
            actor_id: "emp_001".to_string(),
            role: Role::Employee,
            action: "confirm work sessions".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Actor 'emp_001' with role EMPLOYEE may not confirm work sessions"
        );
    }

    #[test]
    fn test_invalid_rate_displays_employee() {
        let error = EngineError::InvalidRate {
            employee_id: "emp_001".to_string(),
            message: "hourly rate -1 is negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid hourly rate for 'emp_001': hourly rate -1 is negative"
        );
        assert_eq!(error.code(), "INVALID_RATE");
    }

    #[test]
    fn test_codes_are_distinct_per_category() {
        let timestamp = EngineError::InvalidTimestamp {
            raw: String::new(),
            reason: String::new(),
        };
        let month = EngineError::InvalidCalendarMonth {
            year: 2025,
            month: 13,
        };
        assert_eq!(timestamp.code(), "INVALID_TIMESTAMP");
        assert_eq!(month.code(), "INVALID_CALENDAR_MONTH");
        assert_eq!(month.to_string(), "Invalid calendar month 2025-13");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_session() -> EngineResult<()> {
            Err(EngineError::MissingWorkSession {
                shift_id: "shift_001".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing_session()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
