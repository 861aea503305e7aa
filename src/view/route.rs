use crate::error::AppError;
use crate::models::ProjectId;

pub const TIMELINE_ROUTE: &str = "/projects/:projectId/timeline-interactive";

/// Matched `/projects/:projectId/timeline-interactive` route.
///
/// The parameter is kept raw; turning it into a [`ProjectId`] is the view's
/// job so that a malformed id yields a fallback screen instead of a routing
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRoute {
    pub project_param: String,
}

impl TimelineRoute {
    /// Match a route path, or accept a bare project id
    pub fn parse(target: &str) -> Result<Self, AppError> {
        let target = target.trim();
        if !target.starts_with('/') {
            return Ok(Self {
                project_param: target.to_string(),
            });
        }

        let path = target.split(['?', '#']).next().unwrap_or(target);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["projects", id, "timeline-interactive"] => Ok(Self {
                project_param: id.to_string(),
            }),
            _ => Err(AppError::Validation(format!(
                "Unknown route: '{}'. Expected {}",
                target, TIMELINE_ROUTE
            ))),
        }
    }

    pub fn path_for(project: ProjectId) -> String {
        format!("/projects/{}/timeline-interactive", project)
    }
}
