use serde::{Deserialize, Serialize};
use crate::models::StageId;

/// Time scale of the timeline; one column covers `days_per_column` days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimelineScale {
    Day,
    #[default]
    Week,
    Month,
    Year,
}

impl TimelineScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineScale::Day => "Day",
            TimelineScale::Week => "Week",
            TimelineScale::Month => "Month",
            TimelineScale::Year => "Year",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Some(TimelineScale::Day),
            "week" => Some(TimelineScale::Week),
            "month" => Some(TimelineScale::Month),
            "year" => Some(TimelineScale::Year),
            _ => None,
        }
    }

    /// Year view is drawn in quarters
    pub fn days_per_column(&self) -> i64 {
        match self {
            TimelineScale::Day => 1,
            TimelineScale::Week => 7,
            TimelineScale::Month => 30,
            TimelineScale::Year => 91,
        }
    }
}

/// Which pair of dates the timeline plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleMode {
    /// Planned start/end
    #[default]
    Estimate,
    /// Actual start/end
    Actual,
}

impl ScheduleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleMode::Estimate => "estimate",
            ScheduleMode::Actual => "actual",
        }
    }
}

/// Task record in the shape Gantt widgets consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttTask {
    pub id: StageId,
    pub name: String,
    pub start: String,
    pub end: String,
    /// 0-100
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_class: Option<String>,
}
