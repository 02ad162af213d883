//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.
//! `/calculate` computes one slip without touching the slip register;
//! `/payslips` runs a batch and submits every generated slip.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{assemble_payroll, run_payroll_batch, EmployeeFailure, PayrollInput};
use crate::error::EngineResult;
use crate::models::{AssignmentHistory, AttendanceSheet, Employee, PayrollMonth};

use super::request::{
    AssignmentRequest, AttendanceRecordRequest, BatchRequest, CalculationRequest, PeriodRequest,
};
use super::response::{ApiError, ApiErrorResponse, BatchResponse, HealthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/payslips", post(payslips_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Computes one employee's slip for a payroll month. The slip register is
/// not consulted or updated; submission happens through `/payslips`.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let period = match validate_period(request.period) {
        Ok(period) => period,
        Err(response) => {
            warn!(correlation_id = %correlation_id, "Invalid payroll period");
            return response.into_response_with(correlation_id);
        }
    };

    let input = match build_payroll_input(
        request.employee.into(),
        request.attendance,
        request.assignments,
    ) {
        Ok(input) => input,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Invalid calculation input"
            );
            let api_error: ApiErrorResponse = err.into();
            return api_error.into_response_with(correlation_id);
        }
    };

    match assemble_payroll(
        &input.employee,
        &input.assignments,
        &input.attendance,
        period,
        request.weekly_off_policy,
        state.config().config(),
    ) {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %record.employee_id,
                period = %record.period.identifier(),
                net_pay = %record.totals.net_pay,
                duration_us = record.audit_trace.duration_us,
                "Calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(record),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            api_error.into_response_with(correlation_id)
        }
    }
}

/// Handler for POST /payslips endpoint.
///
/// Generates slips for a roster and submits each to the slip register.
/// One employee's failure is reported in the body and never aborts the
/// batch, so the endpoint always answers 200 once the request parses.
async fn payslips_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip batch request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let period = match validate_period(request.period) {
        Ok(period) => period,
        Err(response) => {
            warn!(correlation_id = %correlation_id, "Invalid payroll period");
            return response.into_response_with(correlation_id);
        }
    };

    let mut error_messages: Vec<EmployeeFailure> = Vec::new();
    let mut inputs: Vec<PayrollInput> = Vec::new();
    for entry in request.employees {
        let employee: Employee = entry.employee.into();
        let employee_id = employee.id.clone();
        match build_payroll_input(employee, entry.attendance, entry.assignments) {
            Ok(input) => inputs.push(input),
            Err(err) => error_messages.push(EmployeeFailure {
                employee_id,
                reason: err.to_string(),
            }),
        }
    }

    let outcome = {
        let mut register = state.register().write().await;
        run_payroll_batch(
            &inputs,
            period,
            request.weekly_off_policy,
            state.config().config(),
            &mut register,
        )
    };
    error_messages.extend(outcome.error_messages);

    info!(
        correlation_id = %correlation_id,
        period = %period.identifier(),
        success_count = outcome.success_count,
        failed_count = error_messages.len(),
        "Payslip batch completed"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(BatchResponse {
            period: period.identifier(),
            success_count: outcome.success_count,
            failed_count: error_messages.len(),
            error_messages,
            slips: outcome.records,
        }),
    )
        .into_response()
}

/// Handler for GET /health endpoint.
async fn health_handler() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
        .into_response()
}

/// Validates the wire-format period into a [`PayrollMonth`].
///
/// An out-of-range month is the client's mistake, so it answers 422
/// rather than surfacing as an internal calculation error.
fn validate_period(period: PeriodRequest) -> Result<PayrollMonth, ApiErrorResponse> {
    PayrollMonth::new(period.year, period.month).map_err(|err| ApiErrorResponse {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        error: ApiError::validation_error(err.to_string()),
    })
}

/// Converts wire-format attendance and assignments into a validated
/// calculation input for one employee.
fn build_payroll_input(
    employee: Employee,
    attendance: Vec<AttendanceRecordRequest>,
    assignments: Vec<AssignmentRequest>,
) -> EngineResult<PayrollInput> {
    let records = attendance
        .into_iter()
        .map(|r| r.into_record(&employee.id))
        .collect();
    let sheet = AttendanceSheet::new(employee.id.clone(), records)?;

    let converted = assignments
        .into_iter()
        .map(|a| a.into_assignment(&employee.id))
        .collect();
    let history = AssignmentHistory::new(employee.id.clone(), converted)?;

    Ok(PayrollInput {
        employee,
        assignments: history,
        attendance: sheet,
    })
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
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
                ApiError::new("VALIDATION_ERROR", body_text)
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
    ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error,
    }
    .into_response_with(correlation_id)
}
