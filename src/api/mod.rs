//! HTTP API module for the payroll recalculation engine.
//!
//! A thin REST surface over the engine's operations: recording and
//! deleting attendance, forcing recalculation, seeding a month, and
//! fetching payroll rows.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AttendanceRequest, RecalculateRequest, SeedRequest};
pub use response::{ApiError, AttendanceResponse, SeedResponse};
pub use state::AppState;
