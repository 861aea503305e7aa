// Turning stage records into drawable timeline rows

use crate::models::{GanttTask, ScheduleMode, Stage, StageId, StageStatus};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

/// Data problem found in a stages overview.
/// Warnings never fail a fetch; they are shown next to the timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum StageWarning {
    InvertedRange {
        stage: StageId,
        mode: ScheduleMode,
        start: NaiveDate,
        end: NaiveDate,
    },
    ProgressOutOfRange {
        stage: StageId,
        progress: f64,
    },
    UnknownDependency {
        stage: StageId,
        dependency: String,
    },
    SelfDependency {
        stage: StageId,
    },
}

impl fmt::Display for StageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageWarning::InvertedRange { stage, mode, start, end } => write!(
                f,
                "stage {}: {} start {} is after end {}; bar not drawn",
                stage,
                mode.as_str(),
                start,
                end
            ),
            StageWarning::ProgressOutOfRange { stage, progress } => {
                write!(f, "stage {}: progress {} is outside 0-100; clamped", stage, progress)
            }
            StageWarning::UnknownDependency { stage, dependency } => {
                write!(f, "stage {}: depends on unknown stage '{}'", stage, dependency)
            }
            StageWarning::SelfDependency { stage } => write!(f, "stage {}: depends on itself", stage),
        }
    }
}

/// Check the `start <= end` and `0..=100` invariants and dependency references
pub fn validate_stages(stages: &[Stage]) -> Vec<StageWarning> {
    let known: HashSet<&str> = stages.iter().map(|s| s.id.as_str()).collect();
    let mut warnings = Vec::new();

    for stage in stages {
        let pairs = [
            (ScheduleMode::Estimate, stage.start, stage.end),
            (ScheduleMode::Actual, stage.actual_start_date, stage.actual_end_date),
        ];
        for (mode, start, end) in pairs {
            if let (Some(start), Some(end)) = (start, end) {
                if start > end {
                    warnings.push(StageWarning::InvertedRange {
                        stage: stage.id.clone(),
                        mode,
                        start,
                        end,
                    });
                }
            }
        }

        if let Some(progress) = stage.progress {
            if !(0.0..=100.0).contains(&progress) {
                warnings.push(StageWarning::ProgressOutOfRange {
                    stage: stage.id.clone(),
                    progress,
                });
            }
        }

        for dep in stage.dependency_ids() {
            if dep == stage.id.as_str() {
                warnings.push(StageWarning::SelfDependency { stage: stage.id.clone() });
            } else if !known.contains(dep) {
                warnings.push(StageWarning::UnknownDependency {
                    stage: stage.id.clone(),
                    dependency: dep.to_string(),
                });
            }
        }
    }

    warnings
}

/// Which stages make it onto the timeline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowFilter {
    pub mode: ScheduleMode,
    /// Empty means every status, including stages without one
    pub statuses: Vec<StageStatus>,
}

impl RowFilter {
    fn is_unrestricted(&self) -> bool {
        self.statuses.is_empty() || StageStatus::ALL.iter().all(|s| self.statuses.contains(s))
    }

    fn accepts(&self, stage: &Stage) -> bool {
        match stage.status {
            Some(status) => self.statuses.is_empty() || self.statuses.contains(&status),
            None => self.is_unrestricted(),
        }
    }
}

/// One drawable bar
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow {
    pub id: StageId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Clamped to 0-100
    pub progress: f64,
    pub status: Option<StageStatus>,
    pub dependencies: Option<String>,
    /// Days past the planned end while still incomplete
    pub delay_days: Option<i64>,
}

/// Filter, date-select and order stages for drawing.
///
/// Stages lacking either date for the selected mode are left out, as are
/// inverted ranges (reported by [`validate_stages`]). Rows follow
/// `display_order`; stages without one keep server order after the rest.
pub fn build_rows(stages: &[Stage], filter: &RowFilter, today: NaiveDate) -> Vec<TimelineRow> {
    let mut ordered: Vec<&Stage> = stages.iter().filter(|s| filter.accepts(s)).collect();
    ordered.sort_by_key(|s| (s.display_order.is_none(), s.display_order));

    ordered
        .into_iter()
        .filter_map(|stage| {
            let (start, end) = match filter.mode {
                ScheduleMode::Estimate => (stage.start?, stage.end?),
                ScheduleMode::Actual => (stage.actual_start_date?, stage.actual_end_date?),
            };
            if start > end {
                return None;
            }

            let progress = match stage.progress() {
                p if p.is_finite() => p.clamp(0.0, 100.0),
                _ => 0.0,
            };
            let delay_days = match stage.end {
                Some(planned_end) if today > planned_end && progress < 100.0 => {
                    Some((today - planned_end).num_days())
                }
                _ => None,
            };

            Some(TimelineRow {
                id: stage.id.clone(),
                name: stage.name.clone(),
                start,
                end,
                progress,
                status: stage.status,
                dependencies: stage.dependencies.clone(),
                delay_days,
            })
        })
        .collect()
}

/// Summary shown under the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub delayed: usize,
    pub avg_progress: f64,
}

impl TimelineStats {
    pub fn compute(rows: &[TimelineRow]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let total = rows.len();
        let completed = rows.iter().filter(|r| r.progress >= 100.0).count();
        let not_started = rows.iter().filter(|r| r.progress == 0.0).count();
        let in_progress = total - completed - not_started;
        let delayed = rows.iter().filter(|r| r.delay_days.is_some()).count();
        let avg_progress = rows.iter().map(|r| r.progress).sum::<f64>() / total as f64;

        Some(Self {
            total,
            completed,
            in_progress,
            not_started,
            delayed,
            avg_progress,
        })
    }
}

pub fn to_gantt_tasks(rows: &[TimelineRow]) -> Vec<GanttTask> {
    rows.iter()
        .map(|row| GanttTask {
            id: row.id.clone(),
            name: row.name.clone(),
            start: row.start.format("%Y-%m-%d").to_string(),
            end: row.end.format("%Y-%m-%d").to_string(),
            progress: row.progress,
            dependencies: row.dependencies.clone(),
            custom_class: row
                .status
                .map(|s| format!("status-{}", s.as_str().to_lowercase().replace(' ', "-"))),
        })
        .collect()
}
