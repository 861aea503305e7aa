// Text Gantt renderer

use crate::models::{ProjectId, ScheduleMode, Stage, StageStatus, TimelineScale};
use crate::widget::rows::{build_rows, RowFilter, TimelineRow, TimelineStats};
use crate::widget::TimelineWidget;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::io::Write;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_RED: &str = "\x1b[31m";
const ANSI_FG_BLUE: &str = "\x1b[34m";

const FILLED: char = '█';
const EMPTY: char = '░';
const MAX_LABEL_WIDTH: usize = 24;
const MIN_BAR_WIDTH: usize = 10;

fn status_color(status: Option<StageStatus>) -> &'static str {
    match status {
        Some(StageStatus::Good) => ANSI_FG_GREEN,
        Some(StageStatus::Warning) => ANSI_FG_YELLOW,
        Some(StageStatus::AtRisk) => ANSI_FG_RED,
        None => ANSI_FG_BLUE,
    }
}

/// Truncate to `width` characters, marking the cut with an ellipsis
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[derive(Debug, Clone)]
pub struct GanttOptions {
    pub scale: TimelineScale,
    pub filter: RowFilter,
    /// Total line width in characters
    pub width: usize,
    pub color: bool,
    pub today: NaiveDate,
}

impl Default for GanttOptions {
    fn default() -> Self {
        Self {
            scale: TimelineScale::default(),
            filter: RowFilter::default(),
            width: 100,
            color: false,
            today: Local::now().date_naive(),
        }
    }
}

/// Draws one bar per stage on a shared date axis
pub struct TerminalGantt<W: Write> {
    out: W,
    options: GanttOptions,
}

impl<W: Write> TerminalGantt<W> {
    pub fn new(out: W, options: GanttOptions) -> Self {
        Self { out, options }
    }

    pub fn options(&self) -> &GanttOptions {
        &self.options
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.options.color {
            format!("{}{}{}", color, text, ANSI_RESET)
        } else {
            text.to_string()
        }
    }

    fn bar(&self, row: &TimelineRow, origin: NaiveDate, columns: usize, bar_width: usize) -> String {
        let dpc = self.options.scale.days_per_column();
        let start_col = ((row.start - origin).num_days() / dpc) as usize;
        let end_col = ((row.end - origin).num_days() / dpc) as usize;
        let cells = end_col - start_col + 1;
        let filled = ((cells as f64) * row.progress / 100.0).round() as usize;

        let cell = |col: usize| {
            if col < start_col || col > end_col {
                ' '
            } else if col < start_col + filled {
                FILLED
            } else {
                EMPTY
            }
        };

        // Clip long timelines to the available width
        if columns > bar_width {
            let mut line: String = (0..bar_width - 1).map(cell).collect();
            line.push('>');
            line
        } else {
            (0..columns).map(cell).collect()
        }
    }
}

impl<W: Write> TimelineWidget for TerminalGantt<W> {
    fn render(&mut self, project: ProjectId, stages: &[Stage]) -> Result<()> {
        if stages.is_empty() {
            writeln!(self.out, "No stages in the timeline for project {}.", project)?;
            return Ok(());
        }

        let rows = build_rows(stages, &self.options.filter, self.options.today);
        if rows.is_empty() {
            let hint = match self.options.filter.mode {
                ScheduleMode::Estimate => "planned",
                ScheduleMode::Actual => "actual",
            };
            writeln!(
                self.out,
                "No stages with {} dates match the current filters ({} hidden).",
                hint,
                stages.len()
            )?;
            return Ok(());
        }

        let origin = rows.iter().map(|r| r.start).min().unwrap_or(self.options.today);
        let last = rows.iter().map(|r| r.end).max().unwrap_or(origin);
        let dpc = self.options.scale.days_per_column();
        let columns = ((last - origin).num_days() / dpc) as usize + 1;

        let label_width = rows
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(4, MAX_LABEL_WIDTH);
        // label, two spaces, bar, " 100%" and a late marker
        let bar_width = self
            .options
            .width
            .saturating_sub(label_width + 2 + 16)
            .max(MIN_BAR_WIDTH);

        let title = format!(
            "Project {} timeline ({}, {})",
            project,
            self.options.filter.mode.as_str(),
            self.options.scale.as_str()
        );
        writeln!(self.out, "{}", self.paint(&title, ANSI_BOLD))?;
        writeln!(
            self.out,
            "{:width$}  {} .. {}",
            "",
            origin.format("%Y-%m-%d"),
            last.format("%Y-%m-%d"),
            width = label_width
        )?;

        for row in &rows {
            let label = truncate(&row.name, label_width);
            let bar = self.bar(row, origin, columns, bar_width);
            let mut line = format!(
                "{:<width$}  {} {:>3.0}%",
                label,
                self.paint(&bar, status_color(row.status)),
                row.progress,
                width = label_width
            );
            if let Some(days) = row.delay_days {
                line.push_str(&self.paint(&format!(" +{}d late", days), ANSI_FG_RED));
            }
            writeln!(self.out, "{}", line.trim_end())?;
        }

        if let Some(stats) = TimelineStats::compute(&rows) {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "Total: {}  Completed: {}  In progress: {}  Not started: {}  Delayed: {}  Avg progress: {:.1}%",
                stats.total,
                stats.completed,
                stats.in_progress,
                stats.not_started,
                stats.delayed,
                stats.avg_progress
            )?;
        }

        Ok(())
    }
}
