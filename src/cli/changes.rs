// Pending stage edits: recording through the widget callbacks and sending them

use crate::client::{QueryClient, StagesApi};
use crate::error::AppError;
use crate::models::{PendingChange, ProjectId, ScheduleMode, Stage, StageId, TimelineScale};
use crate::store::{PendingChangeRepo, PreferenceRepo};
use crate::widget::TimelineEvents;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use log::{info, warn};
use rusqlite::Connection;

/// Host side of [`TimelineEvents`]: date edits become pending changes and
/// scale switches become the stored default.
pub struct ChangeRecorder<'a> {
    conn: &'a Connection,
    project: ProjectId,
    mode: ScheduleMode,
}

impl<'a> ChangeRecorder<'a> {
    pub fn new(conn: &'a Connection, project: ProjectId, mode: ScheduleMode) -> Self {
        Self { conn, project, mode }
    }
}

impl TimelineEvents for ChangeRecorder<'_> {
    fn on_date_change(&mut self, stage: &Stage, start: NaiveDate, end: NaiveDate) -> Result<()> {
        if start > end {
            return Err(anyhow!(AppError::Validation(format!(
                "Start date {} is after end date {} for stage {}",
                start, end, stage.id
            ))));
        }
        let change = PendingChange::new(self.project, stage.id.clone(), self.mode, start, end);
        PendingChangeRepo::upsert(self.conn, &change)?;
        info!(
            "recorded {} dates {}..{} for stage {} of project {}",
            self.mode.as_str(),
            start,
            end,
            stage.id,
            self.project
        );
        Ok(())
    }

    fn on_view_change(&mut self, scale: TimelineScale) -> Result<()> {
        PreferenceRepo::set_timeline_scale(self.conn, scale)
    }
}

/// Result of sending a project's pending changes
#[derive(Debug, Default)]
pub struct SaveOutcome {
    pub saved: Vec<StageId>,
    pub failed: Vec<(StageId, AppError)>,
}

/// Send every pending change of `project`, one update per stage.
///
/// Sent changes are removed from the store; failed ones stay for the next
/// attempt. The project's cached overview is invalidated either way.
pub fn save_changes<A: StagesApi>(
    conn: &Connection,
    client: &mut QueryClient<A>,
    project: ProjectId,
) -> Result<SaveOutcome> {
    let changes = PendingChangeRepo::list(conn, project)?;
    let mut outcome = SaveOutcome::default();

    for change in changes {
        match client.api().update_stage(&change.stage_id, &change.to_update()) {
            Ok(()) => {
                PendingChangeRepo::delete(conn, project, &change.stage_id)?;
                outcome.saved.push(change.stage_id);
            }
            Err(err) => {
                warn!("saving stage {} failed: {}", change.stage_id, err);
                outcome.failed.push((change.stage_id, err));
            }
        }
    }

    client.invalidate_project(project);
    Ok(outcome)
}

/// Drop all pending changes of `project`; returns how many were discarded
pub fn undo_changes<A: StagesApi>(conn: &Connection, client: &mut QueryClient<A>, project: ProjectId) -> Result<usize> {
    let removed = PendingChangeRepo::clear(conn, project)?;
    client.invalidate_project(project);
    Ok(removed)
}
