//! Roster Engine for shift scheduling and time tracking
//!
//! This crate normalizes shift and work-session records from heterogeneous
//! backends, buckets them into calendar weeks and months, drives the
//! clock-in / clock-out / confirm workflow, computes payroll summaries and
//! checks shift exchange requests for scheduling conflicts.

#![warn(missing_docs)]

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod exchange;
pub mod models;
pub mod normalize;
pub mod payroll;
pub mod session;
