//! Timestamp normalization.
//!
//! This module decodes the heterogeneous timestamp encodings sent by the
//! scheduling and time-clock backends and lifts wire records into canonical
//! records. Everything else in the engine consumes its output.

mod records;
mod timestamp;

pub use records::{NormalizedShifts, RecordError};
pub use timestamp::{MAX_MILLIS_DIGITS, MILLIS_THRESHOLD, TimestampNormalizer, normalize};
