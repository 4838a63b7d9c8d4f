//! Store traits the engine depends on.
//!
//! The engine treats the data stores as external collaborators behind
//! these traits. Production deployments back them with a database; tests
//! and small deployments use the in-memory implementations in
//! [`crate::store::memory`].

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, CompanyPolicy, EmployeeRef, PayRoll};

/// Seed values for a lazily created payroll row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollDefaults {
    /// The base compensation snapshotted onto the new row.
    pub compensation: Decimal,
    /// The initial tax amount (zero unless administratively set).
    pub tax: Decimal,
}

/// Storage for per-day attendance records, keyed by `(employee_id, date)`.
pub trait AttendanceStore: Send + Sync {
    /// Inserts or replaces the record for its `(employee_id, date)` key.
    fn upsert(&self, record: AttendanceRecord) -> EngineResult<()>;

    /// Fetches the record for an employee and date, if any.
    fn get(&self, employee_id: &str, date: NaiveDate) -> EngineResult<Option<AttendanceRecord>>;

    /// Removes and returns the record for an employee and date, if any.
    fn delete(&self, employee_id: &str, date: NaiveDate) -> EngineResult<Option<AttendanceRecord>>;

    /// Returns all records for an employee within a calendar month.
    fn query_month(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

/// Read-only lookup into the employee surface.
pub trait EmployeeDirectory: Send + Sync {
    /// Returns the employee's current base compensation, or `None` if the
    /// employee does not exist (e.g. was deleted after attendance was
    /// recorded).
    fn base_compensation(&self, employee_id: &str) -> EngineResult<Option<Decimal>>;

    /// Returns all known employees, for bulk payroll seeding.
    fn all(&self) -> EngineResult<Vec<EmployeeRef>>;
}

/// Access to the singleton company policy row.
pub trait PolicyStore: Send + Sync {
    /// Returns the company policy, or `None` when no policy row exists.
    /// A missing policy is not an error; callers substitute zero rates.
    fn company_policy(&self) -> EngineResult<Option<CompanyPolicy>>;
}

/// Storage for monthly payroll rows, keyed by `(employee_id, year, month)`.
pub trait PayrollStore: Send + Sync {
    /// Fetches the row for the key, creating it from `defaults` if absent.
    ///
    /// A concurrent creation race on the same key surfaces as
    /// [`crate::error::EngineError::PayrollConflict`]; the engine retries
    /// the call once before giving up on that key.
    fn get_or_create(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
        defaults: &PayrollDefaults,
    ) -> EngineResult<PayRoll>;

    /// Fetches the row for the key, if any.
    fn get(&self, employee_id: &str, year: i32, month: u32) -> EngineResult<Option<PayRoll>>;

    /// Persists the row, re-deriving its `gross_pay`/`net_pay` totals.
    ///
    /// Implementations must serialize writes to the same row so concurrent
    /// recalculations cannot interleave partial updates.
    fn save(&self, payroll: PayRoll) -> EngineResult<()>;
}
