//! Duration and payroll calculation.
//!
//! This module computes scheduled, worked, break and payable minutes from
//! shifts and their work sessions, and the resulting pay for an employee's
//! rate profile.

mod shift_hours;
mod summary;

pub use shift_hours::{ShiftHours, shift_hours};
pub use summary::{PayrollBasis, PayrollSummary, compute_summary, compute_summary_with_basis};
