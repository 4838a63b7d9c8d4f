//! Thread-safe in-memory store implementations.
//!
//! Each store wraps a `RwLock<HashMap>` for shared concurrent access.
//! Suitable for tests and small deployments where persistence is not
//! required.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, CompanyPolicy, EmployeeRef, PayRoll};

use super::ports::{AttendanceStore, EmployeeDirectory, PayrollDefaults, PayrollStore, PolicyStore};

fn poisoned() -> EngineError {
    EngineError::StoreError {
        message: "store lock poisoned".to_string(),
    }
}

/// In-memory attendance store keyed by `(employee_id, date)`.
#[derive(Default)]
pub struct MemoryAttendanceStore {
    records: RwLock<HashMap<(String, NaiveDate), AttendanceRecord>>,
}

impl MemoryAttendanceStore {
    /// Creates a new, empty attendance store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttendanceStore for MemoryAttendanceStore {
    fn upsert(&self, record: AttendanceRecord) -> EngineResult<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.insert((record.employee_id.clone(), record.date), record);
        Ok(())
    }

    fn get(&self, employee_id: &str, date: NaiveDate) -> EngineResult<Option<AttendanceRecord>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(&(employee_id.to_string(), date)).cloned())
    }

    fn delete(&self, employee_id: &str, date: NaiveDate) -> EngineResult<Option<AttendanceRecord>> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        Ok(records.remove(&(employee_id.to_string(), date)))
    }

    fn query_month(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .values()
            .filter(|r| {
                r.employee_id == employee_id && r.date.year() == year && r.date.month() == month
            })
            .cloned()
            .collect())
    }
}

/// In-memory employee directory.
#[derive(Default)]
pub struct MemoryEmployeeDirectory {
    employees: RwLock<HashMap<String, Decimal>>,
}

impl MemoryEmployeeDirectory {
    /// Creates a new, empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or updates an employee's base compensation.
    pub fn insert(&self, employee_id: impl Into<String>, base_compensation: Decimal) {
        if let Ok(mut employees) = self.employees.write() {
            employees.insert(employee_id.into(), base_compensation);
        }
    }

    /// Removes an employee from the directory.
    pub fn remove(&self, employee_id: &str) {
        if let Ok(mut employees) = self.employees.write() {
            employees.remove(employee_id);
        }
    }
}

impl EmployeeDirectory for MemoryEmployeeDirectory {
    fn base_compensation(&self, employee_id: &str) -> EngineResult<Option<Decimal>> {
        let employees = self.employees.read().map_err(|_| poisoned())?;
        Ok(employees.get(employee_id).copied())
    }

    fn all(&self) -> EngineResult<Vec<EmployeeRef>> {
        let employees = self.employees.read().map_err(|_| poisoned())?;
        Ok(employees
            .iter()
            .map(|(id, compensation)| EmployeeRef {
                id: id.clone(),
                base_compensation: *compensation,
            })
            .collect())
    }
}

/// In-memory singleton policy store.
#[derive(Default)]
pub struct MemoryPolicyStore {
    policy: RwLock<Option<CompanyPolicy>>,
}

impl MemoryPolicyStore {
    /// Creates a store with no policy row; lookups return `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given policy.
    pub fn with_policy(policy: CompanyPolicy) -> Self {
        Self {
            policy: RwLock::new(Some(policy)),
        }
    }

    /// Replaces the policy row.
    pub fn set(&self, policy: CompanyPolicy) {
        if let Ok(mut slot) = self.policy.write() {
            *slot = Some(policy);
        }
    }
}

impl PolicyStore for MemoryPolicyStore {
    fn company_policy(&self) -> EngineResult<Option<CompanyPolicy>> {
        let policy = self.policy.read().map_err(|_| poisoned())?;
        Ok(policy.clone())
    }
}

/// In-memory payroll store keyed by `(employee_id, year, month)`.
///
/// The write lock serializes all writes to a row, so concurrent
/// recalculations of the same key cannot interleave partial updates.
#[derive(Default)]
pub struct MemoryPayrollStore {
    rows: RwLock<HashMap<(String, i32, u32), PayRoll>>,
}

impl MemoryPayrollStore {
    /// Creates a new, empty payroll store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PayrollStore for MemoryPayrollStore {
    fn get_or_create(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
        defaults: &PayrollDefaults,
    ) -> EngineResult<PayRoll> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let row = rows
            .entry((employee_id.to_string(), year, month))
            .or_insert_with(|| {
                PayRoll::new(employee_id, year, month, defaults.compensation, defaults.tax)
            });
        Ok(row.clone())
    }

    fn get(&self, employee_id: &str, year: i32, month: u32) -> EngineResult<Option<PayRoll>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&(employee_id.to_string(), year, month)).cloned())
    }

    fn save(&self, mut payroll: PayRoll) -> EngineResult<()> {
        // Derived totals are re-established on every save.
        payroll.recompute_totals();
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(
            (payroll.employee_id.clone(), payroll.year, payroll.month),
            payroll,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;
    use std::str::FromStr;

    fn decimal(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(employee_id: &str, date_str: &str) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: employee_id.to_string(),
            date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
            check_in: None,
            check_out: None,
            late_minutes: 0,
            overtime_minutes: 0,
            status: AttendanceStatus::Present,
        }
    }

    #[test]
    fn test_attendance_upsert_replaces_same_day() {
        let store = MemoryAttendanceStore::new();
        let mut first = record("emp_001", "2025-08-01");
        first.late_minutes = 5;
        store.upsert(first).unwrap();

        let mut second = record("emp_001", "2025-08-01");
        second.late_minutes = 9;
        store.upsert(second).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let stored = store.get("emp_001", date).unwrap().unwrap();
        assert_eq!(stored.late_minutes, 9);
    }

    #[test]
    fn test_attendance_query_month_filters() {
        let store = MemoryAttendanceStore::new();
        store.upsert(record("emp_001", "2025-08-01")).unwrap();
        store.upsert(record("emp_001", "2025-08-15")).unwrap();
        store.upsert(record("emp_001", "2025-09-01")).unwrap();
        store.upsert(record("emp_002", "2025-08-01")).unwrap();

        let august = store.query_month("emp_001", 2025, 8).unwrap();
        assert_eq!(august.len(), 2);
    }

    #[test]
    fn test_attendance_delete_returns_removed_record() {
        let store = MemoryAttendanceStore::new();
        store.upsert(record("emp_001", "2025-08-01")).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        assert!(store.delete("emp_001", date).unwrap().is_some());
        assert!(store.delete("emp_001", date).unwrap().is_none());
    }

    #[test]
    fn test_employee_directory_lookup_and_remove() {
        let directory = MemoryEmployeeDirectory::new();
        directory.insert("emp_001", decimal("5000"));

        assert_eq!(
            directory.base_compensation("emp_001").unwrap(),
            Some(decimal("5000"))
        );
        directory.remove("emp_001");
        assert_eq!(directory.base_compensation("emp_001").unwrap(), None);
    }

    #[test]
    fn test_policy_store_starts_empty() {
        let store = MemoryPolicyStore::new();
        assert!(store.company_policy().unwrap().is_none());

        store.set(CompanyPolicy::default());
        assert!(store.company_policy().unwrap().is_some());
    }

    #[test]
    fn test_payroll_get_or_create_is_lazy_and_stable() {
        let store = MemoryPayrollStore::new();
        let defaults = PayrollDefaults {
            compensation: decimal("5000"),
            tax: Decimal::ZERO,
        };

        let created = store.get_or_create("emp_001", 2025, 8, &defaults).unwrap();
        assert_eq!(created.compensation, decimal("5000"));

        // A second call with different defaults does not reseed the row.
        let other_defaults = PayrollDefaults {
            compensation: decimal("9999"),
            tax: Decimal::ZERO,
        };
        let fetched = store
            .get_or_create("emp_001", 2025, 8, &other_defaults)
            .unwrap();
        assert_eq!(fetched.compensation, decimal("5000"));
    }

    #[test]
    fn test_payroll_save_recomputes_totals() {
        let store = MemoryPayrollStore::new();
        let defaults = PayrollDefaults {
            compensation: decimal("5000"),
            tax: Decimal::ZERO,
        };
        let mut payroll = store.get_or_create("emp_001", 2025, 8, &defaults).unwrap();
        payroll.bonus = decimal("150");
        payroll.deductions = decimal("120");
        // Leave gross/net stale; save must fix them.
        store.save(payroll).unwrap();

        let stored = store.get("emp_001", 2025, 8).unwrap().unwrap();
        assert_eq!(stored.gross_pay, decimal("5150"));
        assert_eq!(stored.net_pay, decimal("5030"));
    }
}
