//! Overlap detection between a candidate shift and an employee's schedule.
//!
//! Intervals are half-open: two shifts overlap iff
//! `a.start < b.end && b.start < a.end`. Back-to-back shifts, where one ends
//! exactly when the next starts, do not conflict.

use serde::{Deserialize, Serialize};

use crate::models::ShiftRecord;

/// An overlap between a candidate shift and an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftConflict {
    /// The shift that would be added to the employee's schedule.
    pub candidate_shift_id: String,
    /// The already scheduled shift it collides with.
    pub existing_shift_id: String,
    /// Length of the overlap.
    pub overlap_minutes: i64,
}

/// Returns true if `candidate` overlaps any of `existing`.
///
/// `existing` is expected to hold the shifts of the employee who would work
/// `candidate`. A shift with the same ID as the candidate is ignored.
///
/// # Example
///
/// ```
/// use roster_engine::exchange::has_conflict;
/// use roster_engine::models::{Instant, ShiftRecord};
///
/// let hour = 3_600_000;
/// let day = 1_746_403_200_000; // 2025-05-05T00:00Z
/// let shift = |id: &str, from: i64, to: i64| ShiftRecord {
///     id: id.to_string(),
///     employee_id: "emp_001".to_string(),
///     start_time: Instant::from_epoch_millis(day + from * hour).unwrap(),
///     end_time: Instant::from_epoch_millis(day + to * hour).unwrap(),
///     position: String::new(),
///     work_session: None,
/// };
///
/// let existing = vec![shift("a", 9, 17)];
/// assert!(has_conflict(&shift("b", 16, 20), &existing));
/// assert!(!has_conflict(&shift("b", 17, 20), &existing));
/// ```
pub fn has_conflict(candidate: &ShiftRecord, existing: &[ShiftRecord]) -> bool {
    existing
        .iter()
        .any(|shift| shift.id != candidate.id && candidate.overlaps(shift))
}

/// Lists every overlap between `candidate` and `existing`, in input order.
pub fn find_conflicts(candidate: &ShiftRecord, existing: &[ShiftRecord]) -> Vec<ShiftConflict> {
    existing
        .iter()
        .filter(|shift| shift.id != candidate.id && candidate.overlaps(shift))
        .map(|shift| {
            let overlap_start = candidate.start_time.max(shift.start_time);
            let overlap_end = candidate.end_time.min(shift.end_time);
            ShiftConflict {
                candidate_shift_id: candidate.id.clone(),
                existing_shift_id: shift.id.clone(),
                overlap_minutes: overlap_start.minutes_until(overlap_end),
            }
        })
        .collect()
}
