//! Response types for the payroll engine API.
//!
//! This module defines the batch and health response bodies, the error
//! envelope, and the mapping from engine errors to HTTP statuses: domain
//! validation failures are 422, duplicates are 409, configuration and
//! calculation faults are 500.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::EmployeeFailure;
use crate::error::EngineError;
use crate::models::PayrollRecord;

/// Response body for the `/payslips` endpoint.
///
/// A batch run never fails as a whole; this body reports how many slips
/// were generated, how many employees failed, and the slips themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// The period the batch was run for, e.g. `"2024 - February"`.
    pub period: String,
    /// Number of slips generated and submitted.
    pub success_count: usize,
    /// Number of employees that failed.
    pub failed_count: usize,
    /// One entry per failed employee, in input order.
    pub error_messages: Vec<EmployeeFailure>,
    /// The generated slips, in input order.
    pub slips: Vec<PayrollRecord>,
}

/// Response body for the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the service is up.
    pub status: String,
    /// The engine version serving the request.
    pub version: String,
}

/// API error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// The JSON envelope every error response carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorEnvelope {
    /// The error body.
    pub error: ApiError,
    /// The request's correlation identifier, for log matching.
    pub correlation_id: Uuid,
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Wraps the error in the envelope and finishes the response.
    pub fn into_response_with(self, correlation_id: Uuid) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(ApiErrorEnvelope {
                error: self.error,
                correlation_id,
            }),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            },
            EngineError::AssignmentNotFound { employee_id, date } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "ASSIGNMENT_NOT_FOUND",
                    format!(
                        "No active compensation assignment for employee '{}' on {}",
                        employee_id, date
                    ),
                    "The employee is not payroll-eligible for this period",
                ),
            },
            EngineError::VariablePayNotAssigned { division, period } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "VARIABLE_PAY_NOT_ASSIGNED",
                    format!(
                        "No variable pay percentage for division '{}' in period '{}'",
                        division, period
                    ),
                    "Assign the division a percentage for the period before generating",
                ),
            },
            EngineError::DuplicateAttendance { employee_id, date } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new(
                    "DUPLICATE_ATTENDANCE",
                    format!(
                        "Attendance already marked for employee '{}' on {}",
                        employee_id, date
                    ),
                ),
            },
            EngineError::DuplicateSlip {
                employee_id,
                period,
            } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new(
                    "DUPLICATE_SLIP",
                    format!(
                        "Salary slip already exists for employee '{}' in period '{}'",
                        employee_id, period
                    ),
                ),
            },
            EngineError::SlipNotFound { slip_id } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new(
                    "SLIP_NOT_FOUND",
                    format!("No submitted salary slip with id '{}'", slip_id),
                ),
            },
            EngineError::InvalidAttendance {
                employee_id,
                message,
            } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "INVALID_ATTENDANCE",
                    format!("Invalid attendance for employee '{}': {}", employee_id, message),
                    "The attendance data contains invalid information",
                ),
            },
            EngineError::InvalidAssignment {
                employee_id,
                message,
            } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "INVALID_ASSIGNMENT",
                    format!("Invalid assignment for employee '{}': {}", employee_id, message),
                    "The compensation assignment data contains invalid information",
                ),
            },
            EngineError::InvalidEmployee { field, message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "INVALID_EMPLOYEE",
                    format!("Invalid employee field '{}': {}", field, message),
                    "The employee data contains invalid information",
                ),
            },
            EngineError::InvalidComponent { name, message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "INVALID_COMPONENT",
                    format!("Invalid salary component '{}': {}", name, message),
                    "The component is missing from or inconsistent with the catalog",
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
