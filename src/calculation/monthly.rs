//! Monthly attendance aggregation and pay adjustment derivation.
//!
//! These are the pure halves of the monthly recalculation: summing a
//! month's attendance records and converting the sums into bonus and
//! deduction amounts under the company policy. The store I/O around them
//! lives in the engine.

use rust_decimal::Decimal;

use crate::models::{AttendanceRecord, AttendanceStatus, CompanyPolicy};

/// Aggregate attendance totals for one employee in one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthTotals {
    /// Sum of late minutes across the month's records.
    pub late_minutes: u64,
    /// Sum of overtime minutes across the month's records.
    pub overtime_minutes: u64,
    /// Number of records with status `absent`.
    pub absent_days: u32,
}

/// The pay adjustments derived from a month's totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayAdjustments {
    /// Overtime bonus: overtime hours times the overtime rate.
    pub bonus: Decimal,
    /// Lateness plus absence deductions.
    pub deductions: Decimal,
}

/// Sums late minutes, overtime minutes, and absent days over a month's
/// records.
///
/// Records with status `on_leave` contribute their (normally zero) minute
/// counts but are not counted as absences.
pub fn summarize_month(records: &[AttendanceRecord]) -> MonthTotals {
    let mut totals = MonthTotals::default();
    for record in records {
        totals.late_minutes += u64::from(record.late_minutes);
        totals.overtime_minutes += u64::from(record.overtime_minutes);
        if record.status == AttendanceStatus::Absent {
            totals.absent_days += 1;
        }
    }
    totals
}

/// Converts a month's totals into bonus and deduction amounts.
///
/// Minute sums become fractional hours (`minutes / 60`), then:
/// - `deductions = late_hours x late_rate + absent_days x absent_deduction`
/// - `bonus = overtime_hours x overtime_rate`
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{derive_adjustments, MonthTotals};
/// use payroll_engine::models::CompanyPolicy;
/// use rust_decimal::Decimal;
///
/// let totals = MonthTotals {
///     late_minutes: 120,
///     overtime_minutes: 0,
///     absent_days: 1,
/// };
/// let policy = CompanyPolicy {
///     late_deduction_per_hour: Decimal::new(10, 0),
///     overtime_bonus_per_hour: Decimal::new(15, 0),
///     absent_deduction: Decimal::new(100, 0),
/// };
///
/// let adjustments = derive_adjustments(&totals, &policy);
/// assert_eq!(adjustments.deductions, Decimal::new(120, 0)); // 2x10 + 1x100
/// assert_eq!(adjustments.bonus, Decimal::ZERO);
/// ```
pub fn derive_adjustments(totals: &MonthTotals, policy: &CompanyPolicy) -> PayAdjustments {
    let sixty = Decimal::new(60, 0);
    let late_hours = Decimal::from(totals.late_minutes) / sixty;
    let overtime_hours = Decimal::from(totals.overtime_minutes) / sixty;

    let deductions = late_hours * policy.late_deduction_per_hour
        + Decimal::from(totals.absent_days) * policy.absent_deduction;
    let bonus = overtime_hours * policy.overtime_bonus_per_hour;

    PayAdjustments { bonus, deductions }
}
