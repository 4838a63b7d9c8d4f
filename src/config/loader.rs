//! Work-schedule loading functionality.
//!
//! This module provides [`load_schedule`] for reading the work schedule
//! from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::WorkSchedule;

/// Loads the work schedule from the specified YAML file.
///
/// The file must contain `work_start` and `work_end` times in `HH:MM:SS`
/// form; `grace_minutes` is optional and defaults to zero.
///
/// # Errors
///
/// Returns [`EngineError::ConfigNotFound`] if the file does not exist and
/// [`EngineError::ConfigParseError`] if it cannot be parsed.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::load_schedule;
///
/// let schedule = load_schedule("./config/schedule.yaml").unwrap();
/// println!("Work starts at {}", schedule.work_start);
/// ```
pub fn load_schedule(path: impl AsRef<Path>) -> EngineResult<WorkSchedule> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EngineError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }

    let contents = fs::read_to_string(path).map_err(|e| EngineError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    serde_yaml::from_str(&contents).map_err(|e| EngineError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
