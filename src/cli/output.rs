// Output formatting utilities

use crate::models::{PendingChange, Stage, StageStatus};
use crate::utils::format_date;
use crate::widget::terminal::truncate;
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_RED: &str = "\x1b[31m";

const NAME_MAX_WIDTH: usize = 32;

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate, with fallback to the COLUMNS environment
/// variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    100
}

/// Apply bold formatting if in TTY mode
fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn status_cell(status: Option<StageStatus>, width: usize, is_tty: bool) -> String {
    let label = status.map(|s| s.as_str()).unwrap_or("-");
    let padded = format!("{:<width$}", label, width = width);
    let color = match status {
        Some(StageStatus::Good) => ANSI_FG_GREEN,
        Some(StageStatus::Warning) => ANSI_FG_YELLOW,
        Some(StageStatus::AtRisk) => ANSI_FG_RED,
        None => return padded,
    };
    if is_tty {
        format!("{}{}{}", color, padded, ANSI_RESET)
    } else {
        padded
    }
}

fn date_span(start: Option<chrono::NaiveDate>, end: Option<chrono::NaiveDate>) -> String {
    if start.is_none() && end.is_none() {
        return "-".to_string();
    }
    format!("{} .. {}", format_date(start), format_date(end))
}

/// Format the stages overview as a table, in server order
pub fn format_stages_table(stages: &[Stage], is_tty: bool) -> String {
    let rows: Vec<[String; 5]> = stages
        .iter()
        .map(|stage| {
            [
                stage.id.to_string(),
                truncate(&stage.name, NAME_MAX_WIDTH),
                date_span(stage.start, stage.end),
                date_span(stage.actual_start_date, stage.actual_end_date),
                format!("{:.0}%", stage.progress()),
            ]
        })
        .collect();

    let headers = ["ID", "Name", "Planned", "Actual", "Progress"];
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let status_width = stages
        .iter()
        .filter_map(|s| s.status.map(|st| st.as_str().len()))
        .max()
        .unwrap_or(0)
        .max("Status".len());

    let mut output = String::new();
    let header_line = format!(
        "{:<w0$}  {:<w1$}  {:<ws$}  {:<w2$}  {:<w3$}  {:>w4$}",
        headers[0],
        headers[1],
        "Status",
        headers[2],
        headers[3],
        headers[4],
        w0 = widths[0],
        w1 = widths[1],
        ws = status_width,
        w2 = widths[2],
        w3 = widths[3],
        w4 = widths[4],
    );
    output.push_str(&bold_if_tty(&header_line, is_tty));
    output.push('\n');
    let total_width = widths.iter().sum::<usize>() + status_width + 10;
    output.push_str(&"-".repeat(total_width));
    output.push('\n');

    for (stage, row) in stages.iter().zip(&rows) {
        let line = format!(
            "{:<w0$}  {:<w1$}  {}  {:<w2$}  {:<w3$}  {:>w4$}",
            row[0],
            row[1],
            status_cell(stage.status, status_width, is_tty),
            row[2],
            row[3],
            row[4],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
            w4 = widths[4],
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output.push_str(&format!("\n{} stage(s)\n", stages.len()));
    output
}

/// Format pending changes, oldest first
pub fn format_pending_changes(changes: &[PendingChange]) -> String {
    let id_width = changes
        .iter()
        .map(|c| c.stage_id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("Stage".len());

    let mut output = format!("{:<w$}  {:<8}  Dates\n", "Stage", "Mode", w = id_width);
    for change in changes {
        output.push_str(&format!(
            "{:<w$}  {:<8}  {} .. {}\n",
            change.stage_id,
            change.mode.as_str(),
            change.start,
            change.end,
            w = id_width
        ));
    }
    output
}
