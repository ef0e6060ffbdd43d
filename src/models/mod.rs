//! Core data models for the Roster Engine.
//!
//! This module contains the canonical domain models and their wire forms
//! as sent by the scheduling and time-clock backends.

mod calendar;
mod employee;
mod exchange_request;
mod instant;
mod shift;
mod timestamp;
mod work_session;

pub use calendar::Calendar;
pub use employee::{Actor, EmployeeRateProfile, Role};
pub use exchange_request::{ExchangeKind, ExchangeRequest, RawExchangeRequest};
pub use instant::Instant;
pub use shift::{RawShiftRecord, ShiftRecord};
pub use timestamp::RawTimestamp;
pub use work_session::{RawWorkSession, WorkSession};
