//! Response and error types for the payroll API.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AttendanceRecord, PayRoll};

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

    /// Creates a malformed-JSON error.
    pub fn malformed_json(details: impl Into<String>) -> Self {
        Self {
            code: "MALFORMED_JSON".to_string(),
            message: "Request body is not valid JSON".to_string(),
            details: Some(details.into()),
        }
    }
}

/// An [`ApiError`] paired with the HTTP status to respond with.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let (status, code) = match &error {
            EngineError::InvalidAttendance { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            EngineError::AttendanceNotFound { .. } => {
                (StatusCode::NOT_FOUND, "ATTENDANCE_NOT_FOUND")
            }
            EngineError::EmployeeNotFound { .. } => (StatusCode::NOT_FOUND, "EMPLOYEE_NOT_FOUND"),
            EngineError::PayrollNotFound { .. } => (StatusCode::NOT_FOUND, "PAYROLL_NOT_FOUND"),
            EngineError::PayrollConflict { .. } => (StatusCode::CONFLICT, "PAYROLL_CONFLICT"),
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::StoreError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };
        Self {
            status,
            error: ApiError::new(code, error.to_string()),
        }
    }
}

/// Body of a successful `POST /attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    /// The stored record, with derived minutes stamped.
    pub record: AttendanceRecord,
    /// Payroll rows recalculated when the request's unit of work
    /// committed.
    pub recalculated: Vec<PayRoll>,
}

/// Body of a successful `POST /payroll/seed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeedResponse {
    /// Number of payroll rows newly created.
    pub created: usize,
}
