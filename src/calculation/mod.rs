//! Calculation logic for the payroll recalculation engine.
//!
//! This module contains the pure calculation functions: per-record
//! lateness/overtime derivation from raw timestamps, and monthly
//! aggregation of attendance into bonus and deduction amounts.

mod minutes;
mod monthly;

pub use minutes::{DerivedMinutes, derive_minutes, validate_span};
pub use monthly::{MonthTotals, PayAdjustments, derive_adjustments, summarize_month};
