//! Configuration loading and management for the roster engine.
//!
//! This module loads `engine.yaml`: the local calendar offset, the legacy
//! timestamp compatibility mode and the payroll basis.
//!
//! # Example
//!
//! ```no_run
//! use roster_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Payroll basis: {:?}", config.payroll_basis());
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{CalendarSection, EngineConfig, PayrollSection, TimestampsSection};
