use crate::models::Stage;
use crate::widget::StageWarning;

/// Resolved timeline payload
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineData {
    pub stages: Vec<Stage>,
    pub warnings: Vec<StageWarning>,
}

/// Timeline screen state
///
/// `Loading` moves to `Ready` or `Error`; `Error` goes back to `Loading` on
/// retry. `Invalid` is terminal: the route parameter is not a project id and
/// nothing is fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Ready(TimelineData),
    Error(String),
    Invalid(String),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Ready(_) => "ready",
            ViewState::Error(_) => "error",
            ViewState::Invalid(_) => "invalid",
        }
    }

    pub fn data(&self) -> Option<&TimelineData> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }
}
