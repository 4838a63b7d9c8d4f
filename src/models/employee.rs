//! Employee reference model.
//!
//! The engine reads only what payroll needs from the employee surface: an
//! identifier and the current base compensation. The full employee CRUD
//! lives outside the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The slice of an employee the payroll engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's current monthly base compensation.
    pub base_compensation: Decimal,
}
