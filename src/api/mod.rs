//! HTTP API module for the roster engine.
//!
//! This module exposes the engine operations as JSON endpoints:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | POST | `/normalize` | normalize a shift batch |
//! | POST | `/calendar/weeks` | Monday-start week buckets, optional week view |
//! | POST | `/calendar/months` | `YYYY-MM` month buckets |
//! | POST | `/calendar/month` | Sunday-first 6×7 month grid |
//! | POST | `/payroll/summary` | payroll summary for one employee |
//! | POST | `/work-sessions/transition` | apply a work-session event |
//! | POST | `/work-sessions/actions` | actions an actor may take |
//! | POST | `/exchange/evaluate` | swap / take-over conflict evaluation |

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ActionsRequest, BucketRequest, ExchangeEvaluationRequest, MonthGridRequest, NormalizeRequest,
    PayrollRequest, TransitionRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, BucketResponse, MonthGridResponse, TransitionResponse,
};
pub use state::AppState;
