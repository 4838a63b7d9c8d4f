//! Configuration types for the work schedule.
//!
//! This module contains the strongly-typed schedule structure that is
//! deserialized from the YAML configuration file.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

/// The expected work-day boundaries and lateness grace period.
///
/// The schedule is process-wide policy: it is read when an attendance record
/// is saved and when a month is recalculated, and is never mutated by the
/// engine. Changing the schedule affects only records computed after the
/// change; previously stamped minutes are not rewritten unless an explicit
/// recalculation is requested.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkSchedule {
    /// The scheduled start of the work day.
    pub work_start: NaiveTime,
    /// The scheduled end of the work day.
    pub work_end: NaiveTime,
    /// Minutes after `work_start` during which a check-in is not late.
    #[serde(default)]
    pub grace_minutes: u32,
}

impl WorkSchedule {
    /// Returns the instant on `date` after which a check-in counts as late.
    ///
    /// This is `work_start` plus the grace period, anchored to the record's
    /// date.
    pub fn grace_end(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.work_start) + Duration::minutes(i64::from(self.grace_minutes))
    }

    /// Returns the scheduled end-of-day instant on `date`.
    pub fn scheduled_end(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.work_end)
    }
}

impl Default for WorkSchedule {
    /// The stock 09:00-17:00 day with a 10 minute grace period.
    fn default() -> Self {
        Self {
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            grace_minutes: 10,
        }
    }
}
