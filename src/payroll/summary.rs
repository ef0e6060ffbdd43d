//! Payroll summary aggregation.
//!
//! This module folds per-shift figures from [`super::shift_hours`] into a
//! [`PayrollSummary`] for one employee.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::shift_hours::{ShiftHours, shift_hours};
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeRateProfile, ShiftRecord};
use crate::normalize::RecordError;
use crate::session::SessionState;

/// Which closed work sessions count as completed shifts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollBasis {
    /// Every closed session counts, confirmed or not (preview).
    #[default]
    AllClosed,
    /// Only confirmed sessions count (finalization).
    ConfirmedOnly,
}

impl PayrollBasis {
    fn counts(self, state: SessionState) -> bool {
        match self {
            PayrollBasis::AllClosed => state.is_closed(),
            PayrollBasis::ConfirmedOnly => state.is_confirmed(),
        }
    }
}

/// Scheduled, worked, break and payable time of one employee, with pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    /// The employee the summary is for.
    pub employee_id: String,
    /// The basis completed shifts were selected by.
    pub basis: PayrollBasis,
    /// Sum of scheduled minutes over shifts with a valid interval.
    pub total_scheduled_minutes: i64,
    /// Sum of worked minutes over completed shifts.
    pub total_worked_minutes: i64,
    /// Unpaid break minutes, one break per completed shift.
    pub total_break_minutes: i64,
    /// `max(0, worked - break)`.
    pub payable_minutes: i64,
    /// Payable hours at the hourly rate, rounded to cents.
    pub total_pay: Decimal,
    /// Shifts contributing worked time and a break.
    pub completed_shifts: u32,
    /// Shifts whose session is confirmed.
    pub confirmed_shifts: u32,
    /// Every shift of the employee, including those with errors.
    pub total_shifts: u32,
    /// Scheduled minutes in hours, two decimal places.
    pub scheduled_hours: Decimal,
    /// Worked minutes in hours, two decimal places.
    pub actual_hours: Decimal,
    /// `actual_hours` when positive, `scheduled_hours` otherwise.
    pub display_hours: Decimal,
    /// Per-shift breakdown, in input order.
    pub per_shift: Vec<ShiftHours>,
    /// Records excluded from the totals.
    pub errors: Vec<RecordError>,
}

/// Computes a payroll summary counting every closed session as completed.
///
/// See [`compute_summary_with_basis`].
pub fn compute_summary(
    shifts: &[ShiftRecord],
    rate: &EmployeeRateProfile,
) -> EngineResult<PayrollSummary> {
    compute_summary_with_basis(shifts, rate, PayrollBasis::AllClosed)
}

/// Computes a payroll summary for the employee of `rate`.
///
/// For each of the employee's shifts (shifts of other employees are
/// skipped):
/// 1. Scheduled minutes are always added when the shift interval is valid
/// 2. A shift is completed when its session counts under `basis` and has a
///    positive clocked duration
/// 3. Each completed shift adds its worked minutes and one break
///
/// Then `payable = max(0, worked - break)` and
/// `pay = payable / 60 × hourly_rate`, rounded half away from zero to cents.
///
/// Invalid shift or session intervals never abort the computation; they
/// are excluded from the affected totals and listed in `errors`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRate`] when the hourly rate is negative or
/// the pay does not fit in a [`Decimal`].
///
/// # Arguments
///
/// * `shifts` - The shifts to summarize
/// * `rate` - The employee's rate profile
/// * `basis` - Which closed sessions count as completed
///
/// # Example
///
/// ```
/// use roster_engine::models::{EmployeeRateProfile, Instant, ShiftRecord, WorkSession};
/// use roster_engine::payroll::{PayrollBasis, compute_summary_with_basis};
/// use rust_decimal::Decimal;
///
/// let mut session = WorkSession::new("ws_001", "shift_001");
/// session.clock_in_time = Instant::from_epoch_millis(1_746_435_600_000);
/// session.clock_out_time = Instant::from_epoch_millis(1_746_464_400_000);
///
/// let shift = ShiftRecord {
///     id: "shift_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     start_time: Instant::from_epoch_millis(1_746_435_600_000).unwrap(),
///     end_time: Instant::from_epoch_millis(1_746_464_400_000).unwrap(),
///     position: String::new(),
///     work_session: Some(session),
/// };
/// let rate = EmployeeRateProfile {
///     employee_id: "emp_001".to_string(),
///     hourly_rate: Decimal::new(20, 0),
///     break_duration_minutes_per_shift: 30,
/// };
///
/// let summary = compute_summary_with_basis(&[shift.clone()], &rate, PayrollBasis::AllClosed).unwrap();
/// assert_eq!(summary.payable_minutes, 450);
/// assert_eq!(summary.total_pay, Decimal::new(15000, 2));
///
/// // Not yet confirmed, so nothing is final.
/// let summary = compute_summary_with_basis(&[shift], &rate, PayrollBasis::ConfirmedOnly).unwrap();
/// assert_eq!(summary.completed_shifts, 0);
/// ```
pub fn compute_summary_with_basis(
    shifts: &[ShiftRecord],
    rate: &EmployeeRateProfile,
    basis: PayrollBasis,
) -> EngineResult<PayrollSummary> {
    if rate.hourly_rate < Decimal::ZERO {
        return Err(EngineError::InvalidRate {
            employee_id: rate.employee_id.clone(),
            message: format!("hourly rate {} is negative", rate.hourly_rate),
        });
    }
    let break_minutes = i64::from(rate.break_duration_minutes_per_shift);

    let mut total_scheduled_minutes = 0i64;
    let mut total_worked_minutes = 0i64;
    let mut completed_shifts = 0u32;
    let mut confirmed_shifts = 0u32;
    let mut total_shifts = 0u32;
    let mut per_shift = Vec::new();
    let mut errors = Vec::new();

    for shift in shifts {
        if shift.employee_id != rate.employee_id {
            debug!(
                shift_id = %shift.id,
                shift_employee = %shift.employee_id,
                employee_id = %rate.employee_id,
                "Skipping shift of another employee"
            );
            continue;
        }

        let hours = shift_hours(shift);
        total_shifts += 1;

        total_scheduled_minutes += hours.scheduled_minutes.unwrap_or(0);
        if hours.state.is_confirmed() {
            confirmed_shifts += 1;
        }
        if let Some(worked) = hours.worked_minutes {
            if basis.counts(hours.state) {
                total_worked_minutes += worked;
                completed_shifts += 1;
            }
        }

        errors.extend(hours.errors.iter().cloned());
        per_shift.push(hours);
    }

    let total_break_minutes = break_minutes * i64::from(completed_shifts);
    let payable_minutes = (total_worked_minutes - total_break_minutes).max(0);
    let total_pay = Decimal::from(payable_minutes)
        .checked_mul(rate.hourly_rate)
        .and_then(|value| value.checked_div(Decimal::from(60)))
        .map(round_cents)
        .ok_or_else(|| EngineError::InvalidRate {
            employee_id: rate.employee_id.clone(),
            message: format!(
                "pay for {} payable minutes at {} overflows",
                payable_minutes, rate.hourly_rate
            ),
        })?;

    let scheduled_hours = minutes_to_hours(total_scheduled_minutes);
    let actual_hours = minutes_to_hours(total_worked_minutes);
    let display_hours = if actual_hours > Decimal::ZERO {
        actual_hours
    } else {
        scheduled_hours
    };

    debug!(
        employee_id = %rate.employee_id,
        basis = ?basis,
        total_shifts,
        completed_shifts,
        payable_minutes,
        total_pay = %total_pay,
        "Computed payroll summary"
    );

    Ok(PayrollSummary {
        employee_id: rate.employee_id.clone(),
        basis,
        total_scheduled_minutes,
        total_worked_minutes,
        total_break_minutes,
        payable_minutes,
        total_pay,
        completed_shifts,
        confirmed_shifts,
        total_shifts,
        scheduled_hours,
        actual_hours,
        display_hours,
        per_shift,
        errors,
    })
}

fn minutes_to_hours(minutes: i64) -> Decimal {
    round_cents(Decimal::from(minutes) / Decimal::from(60))
}

fn round_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
