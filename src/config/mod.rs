//! Work-schedule configuration for the payroll recalculation engine.
//!
//! The schedule defines the expected work-day boundaries and the lateness
//! grace period. It is supplied by configuration and read-only to the
//! engine.

mod loader;
mod types;

pub use loader::load_schedule;
pub use types::WorkSchedule;
