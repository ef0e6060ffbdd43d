//! HTTP request handlers for the roster engine API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! handler normalizes its wire payload with the configured calendar, calls
//! the pure engine functions and serializes the result.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calendar::{bucket_by_day, bucket_by_month, bucket_by_week, week_view};
use crate::exchange::evaluate_exchange;
use crate::payroll::compute_summary_with_basis;
use crate::session::{apply_session_event, permitted_actions, resolve_session_state};

use super::request::{
    ActionsRequest, BucketRequest, ExchangeEvaluationRequest, MonthGridRequest, NormalizeRequest,
    PayrollRequest, TransitionRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, BucketResponse, MonthGridResponse, TransitionResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/normalize", post(normalize_handler))
        .route("/calendar/weeks", post(weeks_handler))
        .route("/calendar/months", post(months_handler))
        .route("/calendar/month", post(month_grid_handler))
        .route("/payroll/summary", post(payroll_handler))
        .route("/work-sessions/transition", post(transition_handler))
        .route("/work-sessions/actions", post(actions_handler))
        .route("/exchange/evaluate", post(exchange_handler))
        .with_state(state)
}

/// Handler for POST /normalize endpoint.
///
/// Decodes a batch of shifts and reports the ones that failed.
async fn normalize_handler(
    State(state): State<AppState>,
    payload: Result<Json<NormalizeRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing normalize request");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let normalizer = state.config().normalizer();
    let batch = match request.now {
        Some(now) => normalizer.normalize_shifts_at(&request.shifts, now),
        None => normalizer.normalize_shifts(&request.shifts),
    };

    info!(
        correlation_id = %correlation_id,
        normalized = batch.shifts.len(),
        skipped = batch.errors.len(),
        "Normalization completed"
    );
    json_response(StatusCode::OK, batch)
}

/// Handler for POST /calendar/weeks endpoint.
async fn weeks_handler(
    State(state): State<AppState>,
    payload: Result<Json<BucketRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing week bucketing request");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let config = state.config();
    let batch = config.normalizer().normalize_shifts(&request.shifts);
    let buckets = bucket_by_week(&batch.shifts, config.calendar());
    let view = request
        .week_start
        .map(|start| week_view(&batch.shifts, start, config.calendar()));

    info!(
        correlation_id = %correlation_id,
        buckets = buckets.len(),
        skipped = batch.errors.len(),
        "Week bucketing completed"
    );
    json_response(
        StatusCode::OK,
        BucketResponse {
            buckets,
            week_view: view,
            errors: batch.errors,
        },
    )
}

/// Handler for POST /calendar/months endpoint.
async fn months_handler(
    State(state): State<AppState>,
    payload: Result<Json<BucketRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing month bucketing request");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let config = state.config();
    let batch = config.normalizer().normalize_shifts(&request.shifts);
    let buckets = bucket_by_month(&batch.shifts, config.calendar());

    info!(
        correlation_id = %correlation_id,
        buckets = buckets.len(),
        skipped = batch.errors.len(),
        "Month bucketing completed"
    );
    json_response(
        StatusCode::OK,
        BucketResponse {
            buckets,
            week_view: None,
            errors: batch.errors,
        },
    )
}

/// Handler for POST /calendar/month endpoint.
///
/// Builds the 6×7 display grid of one month.
async fn month_grid_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthGridRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing month grid request");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let config = state.config();
    let batch = config.normalizer().normalize_shifts(&request.shifts);
    match bucket_by_day(&batch.shifts, request.year, request.month, config.calendar()) {
        Ok(grid) => {
            info!(
                correlation_id = %correlation_id,
                year = request.year,
                month = request.month,
                skipped = batch.errors.len(),
                "Month grid completed"
            );
            json_response(
                StatusCode::OK,
                MonthGridResponse {
                    grid,
                    errors: batch.errors,
                },
            )
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Month grid failed");
            error_response(err.into())
        }
    }
}

/// Handler for POST /payroll/summary endpoint.
///
/// Records that fail to normalize are listed ahead of the interval errors
/// found during the computation.
async fn payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll summary request");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let config = state.config();
    let start_time = Instant::now();
    let batch = config.normalizer().normalize_shifts(&request.shifts);
    let basis = request.basis.unwrap_or_else(|| config.payroll_basis());

    let mut summary = match compute_summary_with_basis(&batch.shifts, &request.rate, basis) {
        Ok(summary) => summary,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Payroll summary rejected");
            return error_response(err.into());
        }
    };
    let mut errors = batch.errors;
    errors.append(&mut summary.errors);
    summary.errors = errors;

    info!(
        correlation_id = %correlation_id,
        employee_id = %summary.employee_id,
        shifts_count = summary.total_shifts,
        total_pay = %summary.total_pay,
        errors = summary.errors.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Payroll summary completed"
    );
    json_response(StatusCode::OK, summary)
}

/// Handler for POST /work-sessions/transition endpoint.
///
/// Applies one event and returns the new snapshot. The caller is expected
/// to persist it and send it back with the next request.
async fn transition_handler(
    State(state): State<AppState>,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing work session transition");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let result = state
        .config()
        .normalizer()
        .normalize_shift(&request.shift)
        .and_then(|mut shift| {
            let session = apply_session_event(&shift, &request.actor, &request.event)?;
            shift.work_session = Some(session.clone());
            Ok((shift, session))
        });

    match result {
        Ok((shift, session)) => {
            let session_state = resolve_session_state(Some(&session));
            info!(
                correlation_id = %correlation_id,
                shift_id = %shift.id,
                actor_id = %request.actor.id,
                event = request.event.name(),
                state = %session_state,
                "Work session transition applied"
            );
            json_response(
                StatusCode::OK,
                TransitionResponse {
                    permitted_actions: permitted_actions(&shift, &request.actor),
                    work_session: session,
                    state: session_state,
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                shift_id = %request.shift.id,
                event = request.event.name(),
                error = %err,
                "Work session transition rejected"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /work-sessions/actions endpoint.
async fn actions_handler(
    State(state): State<AppState>,
    payload: Result<Json<ActionsRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing permitted actions request");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.config().normalizer().normalize_shift(&request.shift) {
        Ok(shift) => json_response(StatusCode::OK, permitted_actions(&shift, &request.actor)),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Shift failed to normalize");
            error_response(err.into())
        }
    }
}

/// Handler for POST /exchange/evaluate endpoint.
///
/// A schedule with any undecodable record is treated as unavailable, so the
/// verdict becomes `UNKNOWN` instead of a possibly wrong `CLEAR`.
async fn exchange_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExchangeEvaluationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing exchange evaluation request");

    let request = match parse_payload(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let config = state.config();
    let normalizer = config.normalizer();
    let exchange = match normalizer.normalize_exchange_request(&request.request) {
        Ok(exchange) => exchange,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Exchange request failed to normalize");
            return error_response(err.into());
        }
    };

    let schedule = request.schedule.as_deref().and_then(|raw| {
        let batch = normalizer.normalize_shifts(raw);
        if batch.errors.is_empty() {
            Some(batch.shifts)
        } else {
            warn!(
                correlation_id = %correlation_id,
                skipped = batch.errors.len(),
                "Schedule incomplete, conflict status unknown"
            );
            None
        }
    });

    let evaluation = evaluate_exchange(&exchange, schedule.as_deref(), config.calendar());
    info!(
        correlation_id = %correlation_id,
        request_id = %evaluation.request_id,
        status = ?evaluation.status,
        approval_enabled = evaluation.approval.is_enabled(),
        "Exchange evaluation completed"
    );
    json_response(StatusCode::OK, evaluation)
}

/// Extracts the request body, turning JSON rejections into 400 responses.
fn parse_payload<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            // Check if it's a missing field error
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err(json_response(StatusCode::BAD_REQUEST, error))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config").expect("Failed to load config");
        AppState::new(config)
    }

    async fn post_json(uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, body) = post_json("/normalize", "{invalid json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let (status, body) = post_json("/payroll/summary", r#"{"shifts": []}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("missing field"));
    }

    #[tokio::test]
    async fn test_missing_content_type_returns_400() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/normalize")
                    .body(Body::from(r#"{"shifts": []}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_normalize_reports_bad_records() {
        let body = r#"{
            "shifts": [
                {"id": "a", "employeeId": "emp_001", "startTime": "1746421200", "endTime": 1746450000},
                {"id": "b", "employeeId": "emp_001", "startTime": "later", "endTime": 1746450000}
            ]
        }"#;

        let (status, body) = post_json("/normalize", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shifts"][0]["startTime"], 1_746_421_200_000i64);
        assert_eq!(body["errors"][0]["recordId"], "b");
        assert_eq!(body["errors"][0]["code"], "INVALID_TIMESTAMP");
    }

    #[tokio::test]
    async fn test_invalid_month_returns_400() {
        let (status, body) =
            post_json("/calendar/month", r#"{"year": 2025, "month": 13, "shifts": []}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_CALENDAR_MONTH");
    }
}
