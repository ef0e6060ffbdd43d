//! Week and month bucketing.
//!
//! Weeks always start on Monday. A shift belongs to the period containing
//! the local calendar date of its start.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Calendar, ShiftRecord};

/// A group of shifts sharing a calendar period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarBucket {
    /// Deterministic key: `YYYY-MM-DD` of the week's Monday, or `YYYY-MM`.
    pub period_key: String,
    /// The first day of the period.
    pub period_start: NaiveDate,
    /// The shifts in the period, ascending by start time.
    pub shifts: Vec<ShiftRecord>,
}

/// One day column of a [`WeekView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayColumn {
    /// The calendar date of the column.
    pub date: NaiveDate,
    /// The shifts starting on that date, ascending by start time.
    pub shifts: Vec<ShiftRecord>,
}

/// A Monday-to-Sunday view of a single week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    /// The Monday the view starts on.
    pub week_start: NaiveDate,
    /// Seven day columns, Monday first.
    pub days: Vec<DayColumn>,
}

/// Returns the Monday on or before `date`.
///
/// Computed as `date - ((dayOfWeek + 6) % 7)` with Sunday as day 0.
///
/// # Example
///
/// ```
/// use roster_engine::calendar::week_start;
/// use chrono::NaiveDate;
///
/// let sunday = NaiveDate::from_ymd_opt(2025, 5, 11).unwrap();
/// assert_eq!(week_start(sunday), NaiveDate::from_ymd_opt(2025, 5, 5).unwrap());
/// ```
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let day_of_week = date.weekday().num_days_from_sunday();
    let back = u64::from((day_of_week + 6) % 7);
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Partitions shifts into Monday-start weeks.
///
/// Buckets are ordered by period key; within a bucket shifts are sorted by
/// start time, keeping the input order for ties. Every input shift lands in
/// exactly one bucket.
///
/// # Example
///
/// ```
/// use roster_engine::calendar::bucket_by_week;
/// use roster_engine::models::{Calendar, Instant, ShiftRecord};
///
/// let shift = |id: &str, start_ms: i64| ShiftRecord {
///     id: id.to_string(),
///     employee_id: "emp_001".to_string(),
///     start_time: Instant::from_epoch_millis(start_ms).unwrap(),
///     end_time: Instant::from_epoch_millis(start_ms + 8 * 3_600_000).unwrap(),
///     position: String::new(),
///     work_session: None,
/// };
///
/// // Mon 2025-05-05 and Sun 2025-05-11 share a week; Mon 2025-05-12 does not.
/// let shifts = vec![
///     shift("a", 1_746_435_600_000),
///     shift("b", 1_746_954_000_000),
///     shift("c", 1_747_040_400_000),
/// ];
/// let buckets = bucket_by_week(&shifts, &Calendar::utc());
/// assert_eq!(buckets.len(), 2);
/// assert_eq!(buckets[0].period_key, "2025-05-05");
/// assert_eq!(buckets[0].shifts.len(), 2);
/// assert_eq!(buckets[1].period_key, "2025-05-12");
/// ```
pub fn bucket_by_week(shifts: &[ShiftRecord], calendar: &Calendar) -> Vec<CalendarBucket> {
    group_by(shifts, |shift| week_start(shift.start_time.local_date(calendar)))
        .into_iter()
        .map(|(start, shifts)| CalendarBucket {
            period_key: start.format("%Y-%m-%d").to_string(),
            period_start: start,
            shifts,
        })
        .collect()
}

/// Partitions shifts into calendar months keyed `YYYY-MM`.
pub fn bucket_by_month(shifts: &[ShiftRecord], calendar: &Calendar) -> Vec<CalendarBucket> {
    group_by(shifts, |shift| {
        let date = shift.start_time.local_date(calendar);
        (date.year(), date.month())
    })
    .into_iter()
    .filter_map(|((year, month), shifts)| {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(CalendarBucket {
            period_key: format!("{:04}-{:02}", year, month),
            period_start: start,
            shifts,
        })
    })
    .collect()
}

/// Builds a seven-column view of the week starting at `week_start`.
///
/// Shifts whose day difference from `week_start` falls outside `[0, 6]`
/// belong to another week and are left out without error, so the same flat
/// list can feed several overlapping views.
pub fn week_view(shifts: &[ShiftRecord], week_start: NaiveDate, calendar: &Calendar) -> WeekView {
    let mut days: Vec<DayColumn> = (0..7u64)
        .filter_map(|offset| week_start.checked_add_days(Days::new(offset)))
        .map(|date| DayColumn {
            date,
            shifts: Vec::new(),
        })
        .collect();

    for shift in shifts {
        let day_difference = (shift.start_time.local_date(calendar) - week_start).num_days();
        if !(0..=6).contains(&day_difference) {
            continue;
        }
        if let Some(column) = usize::try_from(day_difference)
            .ok()
            .and_then(|index| days.get_mut(index))
        {
            column.shifts.push(shift.clone());
        }
    }

    for column in &mut days {
        sort_by_start(&mut column.shifts);
    }

    WeekView { week_start, days }
}

/// Groups shifts by key, sorting each group by start time.
pub(crate) fn group_by<K, F>(shifts: &[ShiftRecord], key: F) -> BTreeMap<K, Vec<ShiftRecord>>
where
    K: Ord,
    F: Fn(&ShiftRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<ShiftRecord>> = BTreeMap::new();
    for shift in shifts {
        groups.entry(key(shift)).or_default().push(shift.clone());
    }
    for group in groups.values_mut() {
        sort_by_start(group);
    }
    groups
}

/// Stable sort by start time.
pub(crate) fn sort_by_start(shifts: &mut [ShiftRecord]) {
    shifts.sort_by_key(|shift| shift.start_time);
}
