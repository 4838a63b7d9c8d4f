//! Attendance-Driven Payroll Recalculation Engine
//!
//! This crate derives per-record lateness and overtime from raw
//! check-in/check-out timestamps against a configurable work schedule,
//! and keeps each employee's monthly payroll row consistent with the
//! aggregate of all attendance for that employee and month. Recalculation
//! triggers are coalesced per unit of work, so a batch of attendance
//! writes in one request recalculates each affected month exactly once at
//! commit.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
