//! Data-store ports and in-memory implementations.

mod memory;
mod ports;

pub use memory::{
    MemoryAttendanceStore, MemoryEmployeeDirectory, MemoryPayrollStore, MemoryPolicyStore,
};
pub use ports::{AttendanceStore, EmployeeDirectory, PayrollDefaults, PayrollStore, PolicyStore};
