use crate::models::{ProjectId, Stage};
use crate::widget::rows::{build_rows, to_gantt_tasks, RowFilter};
use crate::widget::TimelineWidget;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::io::Write;

/// Emits the filtered rows as Gantt task records for external chart tools
pub struct JsonGantt<W: Write> {
    out: W,
    filter: RowFilter,
    today: NaiveDate,
}

impl<W: Write> JsonGantt<W> {
    pub fn new(out: W, filter: RowFilter) -> Self {
        Self {
            out,
            filter,
            today: Local::now().date_naive(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TimelineWidget for JsonGantt<W> {
    fn render(&mut self, project: ProjectId, stages: &[Stage]) -> Result<()> {
        let tasks = to_gantt_tasks(&build_rows(stages, &self.filter, self.today));
        serde_json::to_writer_pretty(&mut self.out, &tasks)
            .with_context(|| format!("Failed to write timeline for project {}", project))?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GanttTask;

    #[test]
    fn test_renders_task_array() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let stages = vec![Stage::new("s1", "Design", day(1), day(10), 50.0)];
        let mut widget = JsonGantt::new(Vec::new(), RowFilter::default());
        widget.render(ProjectId::new(1).unwrap(), &stages).unwrap();

        let tasks: Vec<GanttTask> = serde_json::from_slice(&widget.into_inner()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.as_str(), "s1");
        assert_eq!(tasks[0].end, "2024-01-10");
        assert_eq!(tasks[0].progress, 50.0);
    }

    #[test]
    fn test_empty_renders_empty_array() {
        let mut widget = JsonGantt::new(Vec::new(), RowFilter::default());
        widget.render(ProjectId::new(1).unwrap(), &[]).unwrap();
        assert_eq!(String::from_utf8(widget.into_inner()).unwrap(), "[]\n");
    }
}
