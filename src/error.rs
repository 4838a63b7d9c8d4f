//! Error types for the payroll recalculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while recording attendance or
//! recalculating monthly payroll.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll recalculation engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/schedule.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/schedule.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An attendance write contained inconsistent check-in/check-out data.
    #[error("Invalid attendance for employee '{employee_id}' on {date}: {message}")]
    InvalidAttendance {
        /// The employee the write was for.
        employee_id: String,
        /// The attendance date.
        date: NaiveDate,
        /// A description of what made the write invalid.
        message: String,
    },

    /// No attendance record exists for the given employee and date.
    #[error("Attendance not found for employee '{employee_id}' on {date}")]
    AttendanceNotFound {
        /// The employee the record was requested for.
        employee_id: String,
        /// The attendance date.
        date: NaiveDate,
    },

    /// The employee is not present in the directory.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee identifier that was not found.
        employee_id: String,
    },

    /// No payroll row exists for the given employee and month.
    #[error("Payroll not found for employee '{employee_id}' {year}-{month:02}")]
    PayrollNotFound {
        /// The employee the payroll row was requested for.
        employee_id: String,
        /// The payroll year.
        year: i32,
        /// The payroll month (1-12).
        month: u32,
    },

    /// Concurrent creation of the same payroll row was detected.
    ///
    /// The engine retries the get-or-create once; a second conflict fails
    /// the recalculation for that key, leaving the row in its prior state.
    #[error("Payroll row conflict for employee '{employee_id}' {year}-{month:02}")]
    PayrollConflict {
        /// The employee the payroll row belongs to.
        employee_id: String,
        /// The payroll year.
        year: i32,
        /// The payroll month (1-12).
        month: u32,
    },

    /// A data-store operation failed.
    #[error("Store error: {message}")]
    StoreError {
        /// A description of the store failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
