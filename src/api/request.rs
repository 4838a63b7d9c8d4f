//! Request types for the payroll API.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::engine::AttendanceWrite;
use crate::models::AttendanceStatus;

/// Body of `POST /attendance`.
///
/// Derived minute fields are not accepted here; the engine stamps them.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRequest {
    /// The employee the attendance is for.
    pub employee_id: String,
    /// The calendar day being recorded.
    pub date: NaiveDate,
    /// The check-in timestamp, if any.
    #[serde(default)]
    pub check_in: Option<NaiveDateTime>,
    /// The check-out timestamp, if any.
    #[serde(default)]
    pub check_out: Option<NaiveDateTime>,
    /// The day's attendance status.
    pub status: AttendanceStatus,
}

impl From<AttendanceRequest> for AttendanceWrite {
    fn from(request: AttendanceRequest) -> Self {
        Self {
            employee_id: request.employee_id,
            date: request.date,
            check_in: request.check_in,
            check_out: request.check_out,
            status: request.status,
        }
    }
}

/// Body of `POST /payroll/recalculate`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecalculateRequest {
    /// The employee whose month to recalculate.
    pub employee_id: String,
    /// The payroll year.
    pub year: i32,
    /// The payroll month (1-12).
    pub month: u32,
}

/// Body of `POST /payroll/seed`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRequest {
    /// The payroll year to seed.
    pub year: i32,
    /// The payroll month (1-12) to seed.
    pub month: u32,
}
