//! Per-record lateness and overtime derivation.
//!
//! This module derives `late_minutes` and `overtime_minutes` for a single
//! attendance record from its raw check-in/check-out timestamps and the
//! active [`WorkSchedule`]. The derivation is pure: same inputs always
//! produce the same outputs, and no mutable state is read besides the
//! schedule passed in.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::config::WorkSchedule;

/// The derived minute counts for one attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedMinutes {
    /// Minutes checked in past the end of the grace period.
    pub late_minutes: u32,
    /// Minutes checked out past the scheduled end of day.
    pub overtime_minutes: u32,
}

/// Rounds a positive duration up to whole minutes.
///
/// A 1-second overage counts as a full minute; partial minutes are never
/// rounded down.
fn ceil_minutes(delta: Duration) -> u32 {
    ((delta.num_seconds() + 59) / 60) as u32
}

/// Derives late and overtime minutes for one attendance record.
///
/// - **Late**: if `check_in` is after `work_start + grace_minutes` on
///   `date`, the minute difference rounded up; otherwise 0.
/// - **Overtime**: if `check_out` is before `work_end` on `date`, it is
///   treated as having rolled past midnight (+24h) before comparing; if
///   the (possibly shifted) check-out exceeds `work_end`, the minute
///   difference rounded up; otherwise 0. No check-out means 0.
///
/// The +24h shift models overnight shifts. It can misfire for a
/// legitimately short same-day shift that ends before the nominal
/// `work_end`; that behavior is long-standing and kept as-is.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use payroll_engine::calculation::derive_minutes;
/// use payroll_engine::config::WorkSchedule;
///
/// let schedule = WorkSchedule::default(); // 09:00-17:00, grace 10
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let check_in = date.and_hms_opt(9, 12, 0);
///
/// let derived = derive_minutes(date, check_in, None, &schedule);
/// assert_eq!(derived.late_minutes, 2);
/// assert_eq!(derived.overtime_minutes, 0);
/// ```
pub fn derive_minutes(
    date: NaiveDate,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    schedule: &WorkSchedule,
) -> DerivedMinutes {
    let mut late_minutes = 0;
    let mut overtime_minutes = 0;

    if let Some(check_in) = check_in {
        let grace_end = schedule.grace_end(date);
        if check_in > grace_end {
            late_minutes = ceil_minutes(check_in - grace_end);
        }
    }

    if let Some(check_out) = check_out {
        let scheduled_end = schedule.scheduled_end(date);
        let mut actual_out = check_out;
        if actual_out < scheduled_end {
            // overnight shift
            actual_out += Duration::days(1);
        }
        if actual_out > scheduled_end {
            overtime_minutes = ceil_minutes(actual_out - scheduled_end);
        }
    }

    DerivedMinutes {
        late_minutes,
        overtime_minutes,
    }
}

/// Validates a check-in/check-out pair at the write boundary.
///
/// A check-out earlier than the check-in is only acceptable when the
/// overnight interpretation applies, i.e. the check-out falls before the
/// scheduled end of day and is therefore shifted by +24h. A check-out that
/// is both earlier than the check-in and at-or-after the scheduled end has
/// no consistent reading and is rejected so that negative spans are never
/// stored.
///
/// On rejection the returned message describes the inconsistency; the
/// caller wraps it into a validation error.
pub fn validate_span(
    date: NaiveDate,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    schedule: &WorkSchedule,
) -> Result<(), String> {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Ok(());
    };

    if check_out < check_in && check_out >= schedule.scheduled_end(date) {
        return Err(format!(
            "check-out {} precedes check-in {} with no overnight interpretation",
            check_out, check_in
        ));
    }

    Ok(())
}
