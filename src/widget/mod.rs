//! Timeline visualization
//!
//! Rendering sits behind [`TimelineWidget`] so the drawing backend can be
//! swapped; interaction goes the other way through [`TimelineEvents`], which
//! the hosting command implements.

pub mod rows;
pub mod terminal;
pub mod json;

pub use rows::*;
pub use terminal::{GanttOptions, TerminalGantt};
pub use json::JsonGantt;

use crate::models::{ProjectId, Stage, TimelineScale};
use anyhow::Result;
use chrono::NaiveDate;

/// Draws a project's stages. An empty slice is valid input.
pub trait TimelineWidget {
    fn render(&mut self, project: ProjectId, stages: &[Stage]) -> Result<()>;
}

/// Interaction callbacks a host may handle; all default to doing nothing.
pub trait TimelineEvents {
    fn on_click(&mut self, _stage: &Stage) -> Result<()> {
        Ok(())
    }

    fn on_date_change(&mut self, _stage: &Stage, _start: NaiveDate, _end: NaiveDate) -> Result<()> {
        Ok(())
    }

    /// `progress` on the 0-100 scale
    fn on_progress_change(&mut self, _stage: &Stage, _progress: f64) -> Result<()> {
        Ok(())
    }

    fn on_view_change(&mut self, _scale: TimelineScale) -> Result<()> {
        Ok(())
    }
}
