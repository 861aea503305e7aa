use crate::models::{PendingChange, ProjectId, ScheduleMode, StageId};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Unsent stage date edits
///
/// Mirrors the interactive Gantt's edit buffer: edits accumulate per stage
/// until they are saved to the backend or undone.
pub struct PendingChangeRepo;

impl PendingChangeRepo {
    /// Record an edit, replacing any earlier edit of the same stage
    pub fn upsert(conn: &Connection, change: &PendingChange) -> Result<()> {
        if change.start > change.end {
            return Err(anyhow!(
                "Start date {} is after end date {} for stage {}",
                change.start,
                change.end,
                change.stage_id
            ));
        }

        conn.execute(
            "INSERT INTO pending_changes (project_id, stage_id, mode, start_date, end_date, created_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(project_id, stage_id) DO UPDATE SET
                mode = excluded.mode,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                created_ts = excluded.created_ts",
            rusqlite::params![
                change.project_id.get(),
                change.stage_id.as_str(),
                change.mode.as_str(),
                change.start.format("%Y-%m-%d").to_string(),
                change.end.format("%Y-%m-%d").to_string(),
                change.created_ts,
            ],
        )
        .with_context(|| format!("Failed to record change for stage {}", change.stage_id))?;
        Ok(())
    }

    /// Edits for one project, oldest first
    pub fn list(conn: &Connection, project: ProjectId) -> Result<Vec<PendingChange>> {
        let mut stmt = conn.prepare(
            "SELECT stage_id, mode, start_date, end_date, created_ts
             FROM pending_changes WHERE project_id = ?1
             ORDER BY created_ts, stage_id",
        )?;

        let rows = stmt.query_map([project.get()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut changes = Vec::new();
        for row in rows {
            let (stage_id, mode, start, end, created_ts) = row?;
            let mode = match mode.as_str() {
                "actual" => ScheduleMode::Actual,
                _ => ScheduleMode::Estimate,
            };
            changes.push(PendingChange {
                project_id: project,
                stage_id: StageId::new(stage_id),
                mode,
                start: parse_stored_date(&start)?,
                end: parse_stored_date(&end)?,
                created_ts,
            });
        }
        Ok(changes)
    }

    /// Remove one edit; returns whether it existed
    pub fn delete(conn: &Connection, project: ProjectId, stage: &StageId) -> Result<bool> {
        let removed = conn.execute(
            "DELETE FROM pending_changes WHERE project_id = ?1 AND stage_id = ?2",
            rusqlite::params![project.get(), stage.as_str()],
        )?;
        Ok(removed > 0)
    }

    /// Drop every edit for a project; returns how many were removed
    pub fn clear(conn: &Connection, project: ProjectId) -> Result<usize> {
        let removed = conn.execute(
            "DELETE FROM pending_changes WHERE project_id = ?1",
            [project.get()],
        )?;
        Ok(removed)
    }
}

fn parse_stored_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Corrupt date in pending_changes: '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn change(project: i64, stage: &str, start: NaiveDate, end: NaiveDate, ts: i64) -> PendingChange {
        PendingChange {
            project_id: ProjectId::new(project).unwrap(),
            stage_id: StageId::new(stage),
            mode: ScheduleMode::Estimate,
            start,
            end,
            created_ts: ts,
        }
    }

    #[test]
    fn test_upsert_replaces_same_stage() {
        let conn = LocalStore::connect_in_memory().unwrap();
        let project = ProjectId::new(1).unwrap();

        PendingChangeRepo::upsert(&conn, &change(1, "s1", d(1, 1), d(1, 5), 10)).unwrap();
        let mut newer = change(1, "s1", d(1, 2), d(1, 9), 20);
        newer.mode = ScheduleMode::Actual;
        PendingChangeRepo::upsert(&conn, &newer).unwrap();

        let changes = PendingChangeRepo::list(&conn, project).unwrap();
        assert_eq!(changes, vec![newer]);
    }

    #[test]
    fn test_list_is_scoped_and_ordered() {
        let conn = LocalStore::connect_in_memory().unwrap();
        PendingChangeRepo::upsert(&conn, &change(1, "b", d(1, 1), d(1, 2), 30)).unwrap();
        PendingChangeRepo::upsert(&conn, &change(1, "a", d(1, 1), d(1, 2), 20)).unwrap();
        PendingChangeRepo::upsert(&conn, &change(2, "c", d(1, 1), d(1, 2), 10)).unwrap();

        let ids: Vec<String> = PendingChangeRepo::list(&conn, ProjectId::new(1).unwrap())
            .unwrap()
            .into_iter()
            .map(|c| c.stage_id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let conn = LocalStore::connect_in_memory().unwrap();
        assert!(PendingChangeRepo::upsert(&conn, &change(1, "a", d(2, 1), d(1, 1), 1)).is_err());
    }

    #[test]
    fn test_delete_and_clear() {
        let conn = LocalStore::connect_in_memory().unwrap();
        let project = ProjectId::new(4).unwrap();
        PendingChangeRepo::upsert(&conn, &change(4, "a", d(1, 1), d(1, 2), 1)).unwrap();
        PendingChangeRepo::upsert(&conn, &change(4, "b", d(1, 1), d(1, 2), 2)).unwrap();

        assert!(PendingChangeRepo::delete(&conn, project, &StageId::new("a")).unwrap());
        assert!(!PendingChangeRepo::delete(&conn, project, &StageId::new("a")).unwrap());
        assert_eq!(PendingChangeRepo::clear(&conn, project).unwrap(), 1);
        assert!(PendingChangeRepo::list(&conn, project).unwrap().is_empty());
    }
}
