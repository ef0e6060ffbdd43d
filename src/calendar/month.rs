//! Month grid bucketing for calendar display.
//!
//! The grid follows the display convention of a Sunday-first calendar: six
//! rows of seven days starting on the Sunday on or before the 1st. Leading
//! and trailing days from neighbouring months are flagged but still carry
//! their shifts.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::week::group_by;
use crate::error::{EngineError, EngineResult};
use crate::models::{Calendar, ShiftRecord};

/// Number of cells in a month grid (6 rows of 7 days).
pub const MONTH_GRID_CELLS: usize = 42;

/// One day of a [`MonthGrid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    /// The calendar date of the cell.
    pub date: NaiveDate,
    /// The day of the month of `date`.
    pub day_of_month: u32,
    /// False for leading/trailing days of the neighbouring months.
    pub is_current_month: bool,
    /// The shifts starting on that date, ascending by start time.
    pub shifts: Vec<ShiftRecord>,
}

/// A 6×7 Sunday-first month grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    /// The target year.
    pub year: i32,
    /// The target month (1-based).
    pub month: u32,
    /// The 42 cells, row by row.
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Returns the grid's rows of seven cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    /// Returns the target month's shifts keyed by day of month.
    ///
    /// Every day of the month is present, with an empty list when nothing
    /// is scheduled.
    pub fn shifts_by_day(&self) -> BTreeMap<u32, Vec<ShiftRecord>> {
        self.cells
            .iter()
            .filter(|cell| cell.is_current_month)
            .map(|cell| (cell.day_of_month, cell.shifts.clone()))
            .collect()
    }
}

/// Buckets shifts into the display grid of `year`/`month`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidCalendarMonth`] if `month` is not in
/// `1..=12` or the grid falls outside the supported date range.
///
/// # Example
///
/// ```
/// use roster_engine::calendar::bucket_by_day;
/// use roster_engine::models::Calendar;
///
/// // May 2025 starts on a Thursday; the grid opens on Sunday April 27th.
/// let grid = bucket_by_day(&[], 2025, 5, &Calendar::utc()).unwrap();
/// assert_eq!(grid.cells.len(), 42);
/// assert_eq!(grid.cells[0].day_of_month, 27);
/// assert!(!grid.cells[0].is_current_month);
/// assert_eq!(grid.shifts_by_day().len(), 31);
/// ```
pub fn bucket_by_day(
    shifts: &[ShiftRecord],
    year: i32,
    month: u32,
    calendar: &Calendar,
) -> EngineResult<MonthGrid> {
    let invalid = || EngineError::InvalidCalendarMonth { year, month };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let grid_start = first.checked_sub_days(Days::new(lead)).ok_or_else(invalid)?;

    let by_date = group_by(shifts, |shift| shift.start_time.local_date(calendar));

    let mut cells = Vec::with_capacity(MONTH_GRID_CELLS);
    for offset in 0..MONTH_GRID_CELLS as u64 {
        let date = grid_start
            .checked_add_days(Days::new(offset))
            .ok_or_else(invalid)?;
        cells.push(DayCell {
            date,
            day_of_month: date.day(),
            is_current_month: date.year() == year && date.month() == month,
            shifts: by_date.get(&date).cloned().unwrap_or_default(),
        });
    }

    Ok(MonthGrid { year, month, cells })
}
