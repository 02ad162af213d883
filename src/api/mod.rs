//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for computing monthly
//! salary slips and generating payslip batches.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchRequest, CalculationRequest};
pub use response::{ApiError, ApiErrorEnvelope, BatchResponse, HealthResponse};
pub use state::AppState;
