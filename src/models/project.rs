use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project identifier
///
/// Always a positive integer. Parsing is strict: surrounding whitespace is
/// trimmed, but trailing garbage such as `"42abc"` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ProjectId(i64);

impl ProjectId {
    pub fn new(id: i64) -> Result<Self, AppError> {
        if id > 0 {
            Ok(ProjectId(id))
        } else {
            Err(AppError::Validation(format!(
                "Invalid project ID: {}. Project ID must be positive.",
                id
            )))
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        let trimmed = value.trim();
        let id = trimmed.parse::<i64>().map_err(|_| {
            AppError::Validation(format!(
                "Invalid project ID: '{}'. Project ID must be a number.",
                value
            ))
        })?;
        Self::new(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ProjectId {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectId> for i64 {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}
