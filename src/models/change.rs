use chrono::NaiveDate;
use crate::models::{ProjectId, ScheduleMode, StageId, StageUpdate};

/// Locally recorded stage date edit that has not been sent to the backend yet.
/// At most one per (project, stage); a newer edit replaces the older one.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    pub project_id: ProjectId,
    pub stage_id: StageId,
    pub mode: ScheduleMode,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub created_ts: i64,
}

impl PendingChange {
    pub fn new(project_id: ProjectId, stage_id: StageId, mode: ScheduleMode, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            project_id,
            stage_id,
            mode,
            start,
            end,
            created_ts: chrono::Utc::now().timestamp(),
        }
    }

    /// Estimate edits move the planned dates, actual edits move the actual dates
    pub fn to_update(&self) -> StageUpdate {
        match self.mode {
            ScheduleMode::Estimate => StageUpdate {
                start_date: Some(self.start),
                end_date: Some(self.end),
                ..Default::default()
            },
            ScheduleMode::Actual => StageUpdate {
                actual_start_date: Some(self.start),
                actual_end_date: Some(self.end),
                ..Default::default()
            },
        }
    }
}
