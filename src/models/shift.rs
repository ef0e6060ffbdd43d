//! Shift record model and its wire form.
//!
//! This module defines [`ShiftRecord`], the canonical scheduled work interval,
//! and [`RawShiftRecord`], the same record before timestamp normalization.

use serde::{Deserialize, Serialize};

use super::{Instant, RawTimestamp, RawWorkSession, WorkSession};
use crate::error::{EngineError, EngineResult};

/// A scheduled work interval assigned to an employee.
///
/// `end_time > start_time` is expected but not enforced on construction:
/// records violating it still show up in calendar views and are reported
/// as [`EngineError::InvalidInterval`] by duration computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRecord {
    /// Unique identifier for the shift.
    pub id: String,
    /// The employee the shift is assigned to.
    pub employee_id: String,
    /// The scheduled start.
    pub start_time: Instant,
    /// The scheduled end.
    pub end_time: Instant,
    /// The position or role worked during the shift.
    #[serde(default)]
    pub position: String,
    /// The clock-in/clock-out record, if one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_session: Option<WorkSession>,
}

impl ShiftRecord {
    /// Returns true if the shift ends strictly after it starts.
    pub fn has_valid_interval(&self) -> bool {
        self.end_time > self.start_time
    }

    /// Returns the scheduled length of the shift in minutes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInterval`] if the shift does not end
    /// after it starts.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_engine::models::{Instant, ShiftRecord};
    ///
    /// let shift = ShiftRecord {
    ///     id: "shift_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     start_time: Instant::from_epoch_millis(1_746_435_600_000).unwrap(), // 09:00Z
    ///     end_time: Instant::from_epoch_millis(1_746_464_400_000).unwrap(),   // 17:00Z
    ///     position: "barista".to_string(),
    ///     work_session: None,
    /// };
    /// assert_eq!(shift.scheduled_minutes().unwrap(), 480);
    /// ```
    pub fn scheduled_minutes(&self) -> EngineResult<i64> {
        if !self.has_valid_interval() {
            return Err(EngineError::InvalidInterval {
                record_id: self.id.clone(),
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(self.start_time.minutes_until(self.end_time))
    }

    /// Returns true if the half-open intervals `[start, end)` of both shifts
    /// intersect. Touching intervals do not overlap.
    pub fn overlaps(&self, other: &ShiftRecord) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// A shift record as received from the scheduling backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShiftRecord {
    /// Unique identifier for the shift.
    pub id: String,
    /// The employee the shift is assigned to.
    pub employee_id: String,
    /// The scheduled start in any supported encoding.
    pub start_time: RawTimestamp,
    /// The scheduled end in any supported encoding.
    pub end_time: RawTimestamp,
    /// The position or role worked during the shift.
    #[serde(default)]
    pub position: String,
    /// The clock-in/clock-out record, if one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_session: Option<RawWorkSession>,
}
