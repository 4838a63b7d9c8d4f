//! Unit-of-work scoped recalculation scheduling.
//!
//! Attendance writes do not recalculate payroll inline. Each write marks
//! its `(employee, year, month)` key dirty on the surrounding
//! [`UnitOfWork`]; at the commit boundary the unit of work drains the
//! accumulated keys and recalculates each exactly once, however many
//! writes touched it. An aborted unit of work discards its keys.
//!
//! The pending set is per unit of work, never process-wide, so concurrent
//! requests cannot observe or drain each other's keys.

use std::collections::HashSet;
use std::mem;
use std::sync::Mutex;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::models::PayRoll;

use super::PayrollEngine;

/// A payroll month awaiting recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirtyKey {
    /// The employee whose month is dirty.
    pub employee_id: String,
    /// The payroll year.
    pub year: i32,
    /// The payroll month (1-12).
    pub month: u32,
}

impl DirtyKey {
    /// Creates a key for an explicit employee/year/month.
    pub fn new(employee_id: impl Into<String>, year: i32, month: u32) -> Self {
        Self {
            employee_id: employee_id.into(),
            year,
            month,
        }
    }

    /// Creates the key owning the given attendance date.
    pub fn for_date(employee_id: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(employee_id, date.year(), date.month())
    }
}

/// A recalculation that failed during a drain.
#[derive(Debug)]
pub struct DrainFailure {
    /// The key whose recalculation failed.
    pub key: DirtyKey,
    /// The error it failed with.
    pub error: EngineError,
}

/// The outcome of draining one unit of work.
///
/// Failures are collected per key rather than aborting the batch; one
/// key's failure never prevents the remaining keys from recalculating.
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Keys whose payroll rows were recalculated.
    pub recalculated: Vec<DirtyKey>,
    /// Keys skipped because the employee no longer exists.
    pub skipped: Vec<DirtyKey>,
    /// Keys whose recalculation failed.
    pub failures: Vec<DrainFailure>,
}

impl DrainReport {
    /// Returns true if every captured key recalculated (or was skipped)
    /// without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The transaction context for one logical request.
///
/// Attendance writes made through the engine mark dirty keys here.
/// [`UnitOfWork::commit`] is the commit boundary: it consumes the unit of
/// work, so a drain can run at most once and any key marked afterwards
/// necessarily belongs to a new unit of work. Dropping a unit of work
/// without committing (or calling [`UnitOfWork::abort`]) discards the
/// pending keys entirely, which is the rollback path.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    pending: Mutex<HashSet<DirtyKey>>,
}

impl UnitOfWork {
    /// Creates an empty unit of work.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as needing recalculation at commit.
    ///
    /// Returns `true` if the key was newly added; marking an
    /// already-pending key is a no-op.
    pub fn mark_dirty(&self, key: DirtyKey) -> bool {
        match self.pending.lock() {
            Ok(mut pending) => pending.insert(key),
            Err(poisoned) => poisoned.into_inner().insert(key),
        }
    }

    /// Returns the number of keys currently pending.
    pub fn pending_count(&self) -> usize {
        match self.pending.lock() {
            Ok(pending) => pending.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Atomically takes ownership of the pending set, leaving an empty
    /// one behind. A swap rather than read-then-clear, so no concurrent
    /// mark can fall between the read and the clear.
    fn take_pending(&self) -> HashSet<DirtyKey> {
        match self.pending.lock() {
            Ok(mut pending) => mem::take(&mut *pending),
            Err(poisoned) => mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Commits the unit of work: drains every pending key and runs the
    /// monthly recalculation once per key.
    ///
    /// Keys are processed sequentially in no particular order; they are
    /// independent. A failing key is recorded in the report and logged,
    /// and the drain moves on to the next key.
    pub fn commit(self, engine: &PayrollEngine) -> DrainReport {
        let keys = self.take_pending();
        let mut report = DrainReport::default();

        for key in keys {
            match engine.recalculate_key(&key) {
                Ok(Some(_)) => report.recalculated.push(key),
                Ok(None) => report.skipped.push(key),
                Err(error) => {
                    warn!(
                        employee_id = %key.employee_id,
                        year = key.year,
                        month = key.month,
                        error = %error,
                        "Payroll recalculation failed"
                    );
                    report.failures.push(DrainFailure { key, error });
                }
            }
        }

        report
    }

    /// Aborts the unit of work, discarding all pending keys.
    ///
    /// Equivalent to dropping the unit of work; provided for explicit
    /// rollback call sites.
    pub fn abort(self) {
        let discarded = self.take_pending();
        if !discarded.is_empty() {
            debug!(
                discarded = discarded.len(),
                "Unit of work aborted; dirty keys discarded"
            );
        }
    }
}

/// Commits `uow` and returns the recalculated payroll rows by key.
///
/// Convenience wrapper for call sites that want the resulting rows rather
/// than just the key lists.
pub fn commit_and_fetch(
    uow: UnitOfWork,
    engine: &PayrollEngine,
) -> (DrainReport, Vec<PayRoll>) {
    let report = uow.commit(engine);
    let mut rows = Vec::with_capacity(report.recalculated.len());
    for key in &report.recalculated {
        if let Ok(Some(row)) = engine.payroll(&key.employee_id, key.year, key.month) {
            rows.push(row);
        }
    }
    (report, rows)
}
