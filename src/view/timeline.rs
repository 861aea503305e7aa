use crate::client::{QueryClient, QueryKey, StagesApi};
use crate::models::ProjectId;
use crate::view::state::{TimelineData, ViewState};
use crate::widget::{validate_stages, TimelineWidget};
use anyhow::Result;
use log::{info, warn};
use std::io::Write;

/// Interactive timeline screen for one project.
///
/// # Example
///
/// ```no_run
/// use pcq::client::{HttpStagesClient, QueryClient};
/// use pcq::config::ApiConfig;
/// use pcq::view::TimelineView;
/// use pcq::widget::{GanttOptions, TerminalGantt};
///
/// let api = HttpStagesClient::new(&ApiConfig::default()).unwrap();
/// let mut client = QueryClient::new(api);
/// let mut view = TimelineView::mount("42");
/// view.load(&mut client);
/// let mut widget = TerminalGantt::new(std::io::stdout(), GanttOptions::default());
/// view.render(&mut widget, &mut std::io::stderr()).unwrap();
/// ```
#[derive(Debug)]
pub struct TimelineView {
    project: Option<ProjectId>,
    state: ViewState,
}

impl TimelineView {
    /// Start in `Loading` for a valid id, `Invalid` otherwise
    pub fn mount(project_param: &str) -> Self {
        match ProjectId::parse(project_param) {
            Ok(project) => Self {
                project: Some(project),
                state: ViewState::Loading,
            },
            Err(err) => {
                info!("timeline fetch disabled: {}", err);
                Self {
                    project: None,
                    state: ViewState::Invalid(err.to_string()),
                }
            }
        }
    }

    pub fn project(&self) -> Option<ProjectId> {
        self.project
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn fetch_enabled(&self) -> bool {
        self.project.is_some()
    }

    /// Resolve a pending load. Does nothing unless the view is `Loading`.
    pub fn load<A: StagesApi>(&mut self, client: &mut QueryClient<A>) -> &ViewState {
        let project = match (self.project, &self.state) {
            (Some(project), ViewState::Loading) => project,
            _ => return &self.state,
        };

        self.state = match client.stages_overview(project) {
            Ok(stages) => {
                let warnings = validate_stages(&stages);
                for warning in &warnings {
                    warn!("project {}: {}", project, warning);
                }
                info!("timeline for project {} ready with {} stage(s)", project, stages.len());
                ViewState::Ready(TimelineData { stages, warnings })
            }
            Err(err) => {
                warn!("timeline for project {} failed: {}", project, err);
                ViewState::Error(err.to_string())
            }
        };
        &self.state
    }

    /// Leave `Error` for `Loading`, dropping the cached key so the next
    /// `load` goes back to the server. Returns whether a retry was armed.
    pub fn retry<A: StagesApi>(&mut self, client: &mut QueryClient<A>) -> bool {
        match (self.project, &self.state) {
            (Some(project), ViewState::Error(_)) => {
                client.invalidate(&QueryKey::stages_overview(project));
                self.state = ViewState::Loading;
                true
            }
            _ => false,
        }
    }

    /// Status lines go to `status`; only a `Ready` view reaches the widget.
    pub fn render<W: TimelineWidget + ?Sized>(&self, widget: &mut W, status: &mut dyn Write) -> Result<()> {
        match (&self.state, self.project) {
            (ViewState::Loading, Some(project)) => {
                writeln!(status, "Loading timeline for project {}...", project)?;
            }
            (ViewState::Ready(data), Some(project)) => {
                for warning in &data.warnings {
                    writeln!(status, "Warning: {}", warning)?;
                }
                widget.render(project, &data.stages)?;
            }
            (ViewState::Error(reason), Some(project)) => {
                writeln!(status, "Could not load the timeline for project {}: {}", project, reason)?;
                writeln!(status, "Run the command again to retry.")?;
            }
            (ViewState::Invalid(reason), _) => {
                writeln!(status, "Cannot show a timeline: {}", reason)?;
            }
            (_, None) => {
                writeln!(status, "Cannot show a timeline: no project selected")?;
            }
        }
        Ok(())
    }
}
