//! Attendance record model and related types.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The attendance status of an employee for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The employee attended (possibly late or with overtime).
    Present,
    /// The employee did not attend; counted toward the absence deduction.
    Absent,
    /// The employee was on approved leave; not counted as absent.
    OnLeave,
}

/// One employee's attendance for one calendar day.
///
/// A record is unique per `(employee_id, date)`. The `late_minutes` and
/// `overtime_minutes` fields are derived from the raw check-in/check-out
/// timestamps against the active work schedule at write time; they are
/// never supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The calendar day the record covers.
    pub date: NaiveDate,
    /// When the employee checked in, if they did.
    pub check_in: Option<NaiveDateTime>,
    /// When the employee checked out, if they did.
    pub check_out: Option<NaiveDateTime>,
    /// Minutes checked in past the grace period. Derived.
    pub late_minutes: u32,
    /// Minutes worked past the scheduled end of day. Derived.
    pub overtime_minutes: u32,
    /// The day's attendance status.
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Returns the `(year, month)` of the calendar month this record
    /// belongs to, for payroll aggregation.
    pub fn month_key(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}
