//! Configuration types for the roster engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `engine.yaml`. Every section and field has a
//! default, so a partial file only overrides what it names.

use serde::Deserialize;

use crate::payroll::PayrollBasis;

/// The local calendar used for date bucketing and naive timestamps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    /// Fixed offset from UTC in minutes (e.g. 540 for UTC+09:00).
    pub utc_offset_minutes: i32,
}

/// Timestamp decoding options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimestampsSection {
    /// Substitute the caller-supplied "now" for undecodable timestamps
    /// instead of failing.
    pub legacy_now_fallback: bool,
}

/// Payroll options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PayrollSection {
    /// Which closed work sessions count as completed shifts.
    pub basis: PayrollBasis,
}

/// The complete engine configuration.
///
/// # Example
///
/// ```
/// use roster_engine::config::EngineConfig;
/// use roster_engine::payroll::PayrollBasis;
///
/// let config: EngineConfig = serde_yaml::from_str("payroll:\n  basis: CONFIRMED_ONLY\n").unwrap();
/// assert_eq!(config.payroll.basis, PayrollBasis::ConfirmedOnly);
/// assert_eq!(config.calendar.utc_offset_minutes, 0);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Local calendar settings.
    pub calendar: CalendarSection,
    /// Timestamp decoding settings.
    pub timestamps: TimestampsSection,
    /// Payroll settings.
    pub payroll: PayrollSection,
}
