//! Core data models for the payroll recalculation engine.

mod attendance;
mod employee;
mod payroll;
mod policy;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use employee::EmployeeRef;
pub use payroll::PayRoll;
pub use policy::CompanyPolicy;
