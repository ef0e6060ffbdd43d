//! Employee rate profile and role context.
//!
//! This module defines the [`EmployeeRateProfile`] used by payroll
//! computations and the [`Role`]/[`Actor`] pair that gates managerial
//! work-session actions.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The role of the user issuing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// A regular employee.
    Employee,
    /// A manager of the employee's organization.
    Manager,
    /// An administrator.
    Admin,
}

impl Role {
    /// Returns true if the role may confirm and modify work sessions.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_engine::models::Role;
    ///
    /// assert!(Role::Manager.can_manage_sessions());
    /// assert!(Role::Admin.can_manage_sessions());
    /// assert!(!Role::Employee.can_manage_sessions());
    /// ```
    pub fn can_manage_sessions(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Employee => write!(f, "EMPLOYEE"),
            Role::Manager => write!(f, "MANAGER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// The user issuing a work-session action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The user's identifier, recorded as `confirmedBy` on confirmation.
    pub id: String,
    /// The user's role.
    pub role: Role,
}

/// Pay parameters for one employee, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRateProfile {
    /// The employee the profile applies to.
    pub employee_id: String,
    /// Pay per hour.
    pub hourly_rate: Decimal,
    /// Unpaid break deducted once per completed shift.
    #[serde(default)]
    pub break_duration_minutes_per_shift: u32,
}
