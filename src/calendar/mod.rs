//! Calendar bucketing of shift records.
//!
//! This module partitions a flat list of shifts into Monday-start weeks,
//! months, single-week views and Sunday-first month grids. Bucketing is pure
//! and deterministic: the same input always yields the same buckets in the
//! same order.

mod month;
mod week;

pub use month::{DayCell, MONTH_GRID_CELLS, MonthGrid, bucket_by_day};
pub use week::{
    CalendarBucket, DayColumn, WeekView, bucket_by_month, bucket_by_week, week_start, week_view,
};
