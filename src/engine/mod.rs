//! The payroll recalculation engine.
//!
//! [`PayrollEngine`] owns the attendance write path and the monthly
//! payroll recalculation. Writes stamp derived lateness/overtime minutes
//! onto each record and mark the owning month dirty on the caller's
//! [`UnitOfWork`]; committing the unit of work drains the dirty keys and
//! recalculates each month once, as a full recompute over the month's
//! current attendance rows.

mod uow;

pub use uow::{DirtyKey, DrainFailure, DrainReport, UnitOfWork, commit_and_fetch};

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::calculation::{derive_adjustments, derive_minutes, summarize_month, validate_span};
use crate::config::WorkSchedule;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, PayRoll};
use crate::store::{
    AttendanceStore, EmployeeDirectory, PayrollDefaults, PayrollStore, PolicyStore,
};

/// An inbound attendance write.
///
/// Derived minutes are deliberately absent: callers supply only the raw
/// timestamps, and the engine stamps `late_minutes`/`overtime_minutes`
/// itself before persisting.
#[derive(Debug, Clone)]
pub struct AttendanceWrite {
    /// The employee the write is for.
    pub employee_id: String,
    /// The calendar day being recorded.
    pub date: NaiveDate,
    /// The check-in timestamp, if any.
    pub check_in: Option<NaiveDateTime>,
    /// The check-out timestamp, if any.
    pub check_out: Option<NaiveDateTime>,
    /// The day's attendance status.
    pub status: AttendanceStatus,
}

/// The attendance-driven payroll recalculation engine.
///
/// Holds the active work schedule and the four store ports. The engine is
/// cheap to share: store handles are `Arc`s and the schedule is immutable.
pub struct PayrollEngine {
    schedule: WorkSchedule,
    attendance: Arc<dyn AttendanceStore>,
    employees: Arc<dyn EmployeeDirectory>,
    policy: Arc<dyn PolicyStore>,
    payroll: Arc<dyn PayrollStore>,
}

impl PayrollEngine {
    /// Creates an engine over the given schedule and stores.
    pub fn new(
        schedule: WorkSchedule,
        attendance: Arc<dyn AttendanceStore>,
        employees: Arc<dyn EmployeeDirectory>,
        policy: Arc<dyn PolicyStore>,
        payroll: Arc<dyn PayrollStore>,
    ) -> Self {
        Self {
            schedule,
            attendance,
            employees,
            policy,
            payroll,
        }
    }

    /// Returns the active work schedule.
    pub fn schedule(&self) -> &WorkSchedule {
        &self.schedule
    }

    /// Records (or updates) one day's attendance for an employee.
    ///
    /// Validates the check-in/check-out span, derives the lateness and
    /// overtime minutes against the schedule, persists the record, and
    /// marks the owning month dirty on `uow` for recalculation at commit.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAttendance`] when the check-out precedes the
    /// check-in with no overnight interpretation possible; store errors
    /// are propagated.
    pub fn record_attendance(
        &self,
        uow: &UnitOfWork,
        write: AttendanceWrite,
    ) -> EngineResult<AttendanceRecord> {
        validate_span(write.date, write.check_in, write.check_out, &self.schedule).map_err(
            |message| EngineError::InvalidAttendance {
                employee_id: write.employee_id.clone(),
                date: write.date,
                message,
            },
        )?;

        let derived = derive_minutes(write.date, write.check_in, write.check_out, &self.schedule);
        let record = AttendanceRecord {
            employee_id: write.employee_id,
            date: write.date,
            check_in: write.check_in,
            check_out: write.check_out,
            late_minutes: derived.late_minutes,
            overtime_minutes: derived.overtime_minutes,
            status: write.status,
        };

        self.attendance.upsert(record.clone())?;
        uow.mark_dirty(DirtyKey::for_date(record.employee_id.clone(), record.date));

        info!(
            employee_id = %record.employee_id,
            date = %record.date,
            late_minutes = record.late_minutes,
            overtime_minutes = record.overtime_minutes,
            "Attendance recorded"
        );
        Ok(record)
    }

    /// Deletes one day's attendance for an employee.
    ///
    /// The owning month is marked dirty from the deleted record's key; the
    /// minute derivation is not re-run for a delete.
    ///
    /// # Errors
    ///
    /// [`EngineError::AttendanceNotFound`] when no record exists for the
    /// employee and date.
    pub fn delete_attendance(
        &self,
        uow: &UnitOfWork,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<()> {
        match self.attendance.delete(employee_id, date)? {
            Some(removed) => {
                uow.mark_dirty(DirtyKey::for_date(removed.employee_id.clone(), removed.date));
                info!(employee_id = %removed.employee_id, date = %removed.date, "Attendance deleted");
                Ok(())
            }
            None => Err(EngineError::AttendanceNotFound {
                employee_id: employee_id.to_string(),
                date,
            }),
        }
    }

    /// Synchronously recalculates one employee's month, bypassing the
    /// unit-of-work scheduler. For administrative correction tools.
    ///
    /// Returns `None` when the employee no longer exists; the historical
    /// payroll row, if any, is left untouched.
    pub fn force_recalculate(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<Option<PayRoll>> {
        self.recalculate_key(&DirtyKey::new(employee_id, year, month))
    }

    /// Fetches an employee's payroll row for a month, if one exists.
    pub fn payroll(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<Option<PayRoll>> {
        self.payroll.get(employee_id, year, month)
    }

    /// Pre-creates payroll rows for every employee in the directory for
    /// the given month, seeding compensation from each employee's current
    /// base. Existing rows are left untouched.
    ///
    /// Returns the number of rows newly created.
    pub fn seed_month(&self, year: i32, month: u32) -> EngineResult<usize> {
        let mut created = 0;
        for employee in self.employees.all()? {
            if self.payroll.get(&employee.id, year, month)?.is_some() {
                continue;
            }
            let defaults = PayrollDefaults {
                compensation: employee.base_compensation,
                tax: Decimal::ZERO,
            };
            self.payroll
                .get_or_create(&employee.id, year, month, &defaults)?;
            created += 1;
        }
        info!(year, month, created, "Monthly payroll rows seeded");
        Ok(created)
    }

    /// Full recompute of one `(employee, year, month)` payroll row from
    /// the month's current attendance rows.
    ///
    /// Idempotent: repeated calls with unchanged attendance produce an
    /// identical row. Recomputing from the full row set rather than
    /// applying deltas keeps deletions and concurrent writes from
    /// drifting the totals.
    pub(crate) fn recalculate_key(&self, key: &DirtyKey) -> EngineResult<Option<PayRoll>> {
        let Some(compensation) = self.employees.base_compensation(&key.employee_id)? else {
            warn!(
                employee_id = %key.employee_id,
                year = key.year,
                month = key.month,
                "Skipping payroll recalculation for missing employee"
            );
            return Ok(None);
        };

        let records = self
            .attendance
            .query_month(&key.employee_id, key.year, key.month)?;
        let totals = summarize_month(&records);
        let policy = self.policy.company_policy()?.unwrap_or_default();
        let adjustments = derive_adjustments(&totals, &policy);

        let defaults = PayrollDefaults {
            compensation,
            tax: Decimal::ZERO,
        };
        let mut payroll = match self
            .payroll
            .get_or_create(&key.employee_id, key.year, key.month, &defaults)
        {
            Ok(row) => row,
            Err(EngineError::PayrollConflict { .. }) => {
                // Unique-constraint race: the row exists now, fetch it.
                self.payroll
                    .get_or_create(&key.employee_id, key.year, key.month, &defaults)?
            }
            Err(e) => return Err(e),
        };

        payroll.bonus = adjustments.bonus;
        payroll.deductions = adjustments.deductions;
        payroll.recompute_totals();
        self.payroll.save(payroll.clone())?;

        info!(
            employee_id = %key.employee_id,
            year = key.year,
            month = key.month,
            bonus = %payroll.bonus,
            deductions = %payroll.deductions,
            net_pay = %payroll.net_pay,
            "Monthly payroll recalculated"
        );
        Ok(Some(payroll))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompanyPolicy;
    use crate::store::{
        MemoryAttendanceStore, MemoryEmployeeDirectory, MemoryPayrollStore, MemoryPolicyStore,
    };
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn decimal(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn policy() -> CompanyPolicy {
        CompanyPolicy {
            late_deduction_per_hour: decimal("10"),
            overtime_bonus_per_hour: decimal("15"),
            absent_deduction: decimal("100"),
        }
    }

    struct Fixture {
        engine: PayrollEngine,
        employees: Arc<MemoryEmployeeDirectory>,
    }

    fn fixture_with_payroll_store(payroll: Arc<dyn PayrollStore>) -> Fixture {
        let employees = Arc::new(MemoryEmployeeDirectory::new());
        employees.insert("emp_001", decimal("5000"));
        let engine = PayrollEngine::new(
            WorkSchedule::default(),
            Arc::new(MemoryAttendanceStore::new()),
            employees.clone(),
            Arc::new(MemoryPolicyStore::with_policy(policy())),
            payroll,
        );
        Fixture { engine, employees }
    }

    fn fixture() -> Fixture {
        fixture_with_payroll_store(Arc::new(MemoryPayrollStore::new()))
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn present(day: u32, check_in: (u32, u32), check_out: Option<(u32, u32)>) -> AttendanceWrite {
        AttendanceWrite {
            employee_id: "emp_001".to_string(),
            date: date(day),
            check_in: date(day).and_hms_opt(check_in.0, check_in.1, 0),
            check_out: check_out.and_then(|(h, m)| date(day).and_hms_opt(h, m, 0)),
            status: AttendanceStatus::Present,
        }
    }

    fn absent(day: u32) -> AttendanceWrite {
        AttendanceWrite {
            employee_id: "emp_001".to_string(),
            date: date(day),
            check_in: None,
            check_out: None,
            status: AttendanceStatus::Absent,
        }
    }

    #[test]
    fn test_record_attendance_stamps_derived_minutes() {
        let fixture = fixture();
        let uow = UnitOfWork::new();

        let record = fixture
            .engine
            .record_attendance(&uow, present(1, (9, 12), Some((17, 45))))
            .unwrap();

        assert_eq!(record.late_minutes, 2);
        assert_eq!(record.overtime_minutes, 45);
        assert_eq!(uow.pending_count(), 1);
    }

    #[test]
    fn test_record_attendance_rejects_inconsistent_span() {
        let fixture = fixture();
        let uow = UnitOfWork::new();

        let write = present(1, (18, 0), Some((17, 30)));
        let result = fixture.engine.record_attendance(&uow, write);

        assert!(matches!(
            result,
            Err(EngineError::InvalidAttendance { .. })
        ));
        // A rejected write schedules nothing.
        assert_eq!(uow.pending_count(), 0);
    }

    #[test]
    fn test_commit_recalculates_scenario_c() {
        // 1 absent day + 2h cumulative late -> deductions 120, bonus 0.
        let fixture = fixture();
        let uow = UnitOfWork::new();

        fixture
            .engine
            .record_attendance(&uow, present(1, (10, 10), None)) // 60 late
            .unwrap();
        fixture
            .engine
            .record_attendance(&uow, present(2, (10, 10), None)) // 60 late
            .unwrap();
        fixture.engine.record_attendance(&uow, absent(3)).unwrap();

        let report = uow.commit(&fixture.engine);
        assert!(report.is_clean());
        assert_eq!(report.recalculated.len(), 1);

        let payroll = fixture.engine.payroll("emp_001", 2025, 8).unwrap().unwrap();
        assert_eq!(payroll.deductions, decimal("120"));
        assert_eq!(payroll.bonus, Decimal::ZERO);
        assert_eq!(payroll.gross_pay, decimal("5000"));
        assert_eq!(payroll.net_pay, decimal("4880"));
    }

    #[test]
    fn test_force_recalculate_is_idempotent() {
        let fixture = fixture();
        let uow = UnitOfWork::new();
        fixture
            .engine
            .record_attendance(&uow, present(1, (9, 40), Some((18, 0))))
            .unwrap();
        uow.commit(&fixture.engine);

        let first = fixture
            .engine
            .force_recalculate("emp_001", 2025, 8)
            .unwrap()
            .unwrap();
        let second = fixture
            .engine
            .force_recalculate("emp_001", 2025, 8)
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_recalculation_reflects_deletion() {
        let fixture = fixture();

        let uow = UnitOfWork::new();
        fixture
            .engine
            .record_attendance(&uow, present(1, (10, 10), None))
            .unwrap();
        uow.commit(&fixture.engine);

        let before = fixture.engine.payroll("emp_001", 2025, 8).unwrap().unwrap();
        assert_eq!(before.deductions, decimal("10")); // 1h late x 10

        let uow = UnitOfWork::new();
        fixture
            .engine
            .delete_attendance(&uow, "emp_001", date(1))
            .unwrap();
        let report = uow.commit(&fixture.engine);
        assert_eq!(report.recalculated.len(), 1);

        let after = fixture.engine.payroll("emp_001", 2025, 8).unwrap().unwrap();
        assert_eq!(after.deductions, Decimal::ZERO);
    }

    #[test]
    fn test_delete_unknown_attendance_is_not_found() {
        let fixture = fixture();
        let uow = UnitOfWork::new();
        let result = fixture.engine.delete_attendance(&uow, "emp_001", date(9));
        assert!(matches!(
            result,
            Err(EngineError::AttendanceNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_employee_is_skipped_silently() {
        let fixture = fixture();
        let uow = UnitOfWork::new();
        fixture
            .engine
            .record_attendance(&uow, present(1, (9, 0), None))
            .unwrap();
        fixture.employees.remove("emp_001");

        let report = uow.commit(&fixture.engine);
        assert!(report.is_clean());
        assert_eq!(report.skipped.len(), 1);
        assert!(fixture.engine.payroll("emp_001", 2025, 8).unwrap().is_none());
    }

    #[test]
    fn test_missing_policy_defaults_to_zero_rates() {
        let employees = Arc::new(MemoryEmployeeDirectory::new());
        employees.insert("emp_001", decimal("5000"));
        let engine = PayrollEngine::new(
            WorkSchedule::default(),
            Arc::new(MemoryAttendanceStore::new()),
            employees,
            Arc::new(MemoryPolicyStore::new()), // no policy row
            Arc::new(MemoryPayrollStore::new()),
        );

        let uow = UnitOfWork::new();
        engine.record_attendance(&uow, present(1, (11, 0), None)).unwrap();
        engine.record_attendance(&uow, absent(2)).unwrap();
        let report = uow.commit(&engine);
        assert!(report.is_clean());

        let payroll = engine.payroll("emp_001", 2025, 8).unwrap().unwrap();
        assert_eq!(payroll.deductions, Decimal::ZERO);
        assert_eq!(payroll.bonus, Decimal::ZERO);
        assert_eq!(payroll.net_pay, decimal("5000"));
    }

    /// Payroll store wrapper that counts save calls.
    struct CountingPayrollStore {
        inner: MemoryPayrollStore,
        saves: AtomicUsize,
    }

    impl CountingPayrollStore {
        fn new() -> Self {
            Self {
                inner: MemoryPayrollStore::new(),
                saves: AtomicUsize::new(0),
            }
        }
    }

    impl PayrollStore for CountingPayrollStore {
        fn get_or_create(
            &self,
            employee_id: &str,
            year: i32,
            month: u32,
            defaults: &PayrollDefaults,
        ) -> EngineResult<PayRoll> {
            self.inner.get_or_create(employee_id, year, month, defaults)
        }

        fn get(&self, employee_id: &str, year: i32, month: u32) -> EngineResult<Option<PayRoll>> {
            self.inner.get(employee_id, year, month)
        }

        fn save(&self, payroll: PayRoll) -> EngineResult<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(payroll)
        }
    }

    #[test]
    fn test_many_writes_one_recalculation() {
        // Scenario D: N writes for the same month, one aggregation.
        let counting = Arc::new(CountingPayrollStore::new());
        let fixture = fixture_with_payroll_store(counting.clone());

        let uow = UnitOfWork::new();
        for day in 1..=5 {
            fixture
                .engine
                .record_attendance(&uow, present(day, (10, 10), None)) // 60 late each
                .unwrap();
        }
        assert_eq!(uow.pending_count(), 1);

        let report = uow.commit(&fixture.engine);
        assert_eq!(report.recalculated.len(), 1);
        assert_eq!(counting.saves.load(Ordering::SeqCst), 1);

        // The single recalculation saw the post-write state of all writes.
        let payroll = fixture.engine.payroll("emp_001", 2025, 8).unwrap().unwrap();
        assert_eq!(payroll.deductions, decimal("50")); // 5h late x 10
    }

    #[test]
    fn test_aborted_unit_of_work_leaks_no_keys() {
        let counting = Arc::new(CountingPayrollStore::new());
        let fixture = fixture_with_payroll_store(counting.clone());

        let aborted = UnitOfWork::new();
        fixture
            .engine
            .record_attendance(&aborted, present(1, (10, 0), None))
            .unwrap();
        aborted.abort();

        // An unrelated later unit of work drains nothing of the above.
        let unrelated = UnitOfWork::new();
        let report = unrelated.commit(&fixture.engine);
        assert!(report.recalculated.is_empty());
        assert_eq!(counting.saves.load(Ordering::SeqCst), 0);
    }

    /// Payroll store that reports a creation conflict a fixed number of
    /// times before succeeding.
    struct ConflictingPayrollStore {
        inner: MemoryPayrollStore,
        remaining_conflicts: AtomicUsize,
    }

    impl ConflictingPayrollStore {
        fn failing(times: usize) -> Self {
            Self {
                inner: MemoryPayrollStore::new(),
                remaining_conflicts: AtomicUsize::new(times),
            }
        }
    }

    impl PayrollStore for ConflictingPayrollStore {
        fn get_or_create(
            &self,
            employee_id: &str,
            year: i32,
            month: u32,
            defaults: &PayrollDefaults,
        ) -> EngineResult<PayRoll> {
            let remaining = self.remaining_conflicts.load(Ordering::SeqCst);
            if remaining > 0 {
                self.remaining_conflicts.store(remaining - 1, Ordering::SeqCst);
                return Err(EngineError::PayrollConflict {
                    employee_id: employee_id.to_string(),
                    year,
                    month,
                });
            }
            self.inner.get_or_create(employee_id, year, month, defaults)
        }

        fn get(&self, employee_id: &str, year: i32, month: u32) -> EngineResult<Option<PayRoll>> {
            self.inner.get(employee_id, year, month)
        }

        fn save(&self, payroll: PayRoll) -> EngineResult<()> {
            self.inner.save(payroll)
        }
    }

    #[test]
    fn test_creation_conflict_is_retried_once() {
        let fixture =
            fixture_with_payroll_store(Arc::new(ConflictingPayrollStore::failing(1)));
        let payroll = fixture
            .engine
            .force_recalculate("emp_001", 2025, 8)
            .unwrap()
            .unwrap();
        assert_eq!(payroll.compensation, decimal("5000"));
    }

    #[test]
    fn test_second_conflict_fails_that_key_only() {
        let fixture =
            fixture_with_payroll_store(Arc::new(ConflictingPayrollStore::failing(2)));
        let result = fixture.engine.force_recalculate("emp_001", 2025, 8);
        assert!(matches!(result, Err(EngineError::PayrollConflict { .. })));
    }

    #[test]
    fn test_drain_isolates_per_key_failures() {
        // Two employees; recalculation conflicts twice overall, so the
        // first-drained key fails and the retry budget of the second key
        // is untouched.
        let conflicting = Arc::new(ConflictingPayrollStore::failing(2));
        let fixture = fixture_with_payroll_store(conflicting);
        fixture.employees.insert("emp_002", decimal("4000"));

        let uow = UnitOfWork::new();
        fixture
            .engine
            .record_attendance(&uow, present(1, (9, 0), None))
            .unwrap();
        let mut other = present(1, (9, 0), None);
        other.employee_id = "emp_002".to_string();
        fixture.engine.record_attendance(&uow, other).unwrap();

        let report = uow.commit(&fixture.engine);
        // One key burns both conflicts and fails; the other succeeds.
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.recalculated.len(), 1);
    }

    #[test]
    fn test_seed_month_creates_missing_rows_only() {
        let fixture = fixture();
        fixture.employees.insert("emp_002", decimal("4000"));

        assert_eq!(fixture.engine.seed_month(2025, 8).unwrap(), 2);
        // Second run finds both rows in place.
        assert_eq!(fixture.engine.seed_month(2025, 8).unwrap(), 0);

        let seeded = fixture.engine.payroll("emp_002", 2025, 8).unwrap().unwrap();
        assert_eq!(seeded.compensation, decimal("4000"));
        assert_eq!(seeded.net_pay, decimal("4000"));
    }

    #[test]
    fn test_writes_across_months_dirty_each_month() {
        let fixture = fixture();
        let uow = UnitOfWork::new();

        fixture
            .engine
            .record_attendance(&uow, present(31, (10, 0), None))
            .unwrap();
        let mut september = present(1, (10, 0), None);
        september.date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        september.check_in = september.date.and_hms_opt(10, 0, 0);
        fixture.engine.record_attendance(&uow, september).unwrap();

        assert_eq!(uow.pending_count(), 2);
        let report = uow.commit(&fixture.engine);
        assert_eq!(report.recalculated.len(), 2);
        assert!(fixture.engine.payroll("emp_001", 2025, 9).unwrap().is_some());
    }
}
