// Error handling utilities for consistent error messages and exit codes

use crate::models::{ProjectId, ScheduleMode, StageStatus, TimelineScale};
use chrono::NaiveDate;
use std::fmt;
use std::process;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Failure whose explanation has already been printed; `main` only sets the
/// exit code.
#[derive(Debug)]
pub struct Reported {
    pub exit_code: i32,
}

impl Reported {
    pub fn user() -> Self {
        Self { exit_code: 1 }
    }

    pub fn internal() -> Self {
        Self { exit_code: 2 }
    }
}

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command failed (exit code {})", self.exit_code)
    }
}

impl std::error::Error for Reported {}

/// Validate that a project ID is valid (positive integer)
pub fn validate_project_id(id_str: &str) -> Result<ProjectId, String> {
    ProjectId::parse(id_str).map_err(|_| {
        format!(
            "Invalid project ID: '{}'. Project ID must be a positive number.",
            id_str.trim()
        )
    })
}

/// Validate that a stage ID is not empty
pub fn validate_stage_id(id_str: &str) -> Result<(), String> {
    if id_str.trim().is_empty() {
        Err("Stage ID cannot be empty".to_string())
    } else {
        Ok(())
    }
}

/// Validate that a date range is not inverted
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if start > end {
        Err(format!("Start date {} is after end date {}.", start, end))
    } else {
        Ok(())
    }
}

pub fn parse_scale_arg(value: &str) -> Result<TimelineScale, String> {
    TimelineScale::from_str(value).ok_or_else(|| {
        format!("Invalid scale: '{}'. Expected day, week, month, or year.", value)
    })
}

pub fn parse_mode_arg(value: &str) -> Result<ScheduleMode, String> {
    match value.trim().to_lowercase().as_str() {
        "estimate" | "planned" => Ok(ScheduleMode::Estimate),
        "actual" => Ok(ScheduleMode::Actual),
        _ => Err(format!("Invalid mode: '{}'. Expected estimate or actual.", value)),
    }
}

pub fn parse_status_arg(value: &str) -> Result<StageStatus, String> {
    StageStatus::from_str(value).ok_or_else(|| {
        format!("Invalid status: '{}'. Expected good, warning, or at-risk.", value)
    })
}
