use crate::config::ApiConfig;
use crate::error::AppError;
use crate::models::{ProjectId, Stage, StageId, StageUpdate};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder};

/// Backend operations the timeline needs.
///
/// The HTTP client is the production implementation; tests and offline
/// tooling plug in their own.
pub trait StagesApi {
    /// Fetch the stages overview for one project (possibly empty)
    fn stages_overview(&self, project: ProjectId) -> Result<Vec<Stage>, AppError>;

    /// Apply a partial date update to one stage
    fn update_stage(&self, stage: &StageId, update: &StageUpdate) -> Result<(), AppError>;
}

impl<T: StagesApi + ?Sized> StagesApi for &T {
    fn stages_overview(&self, project: ProjectId) -> Result<Vec<Stage>, AppError> {
        (**self).stages_overview(project)
    }

    fn update_stage(&self, stage: &StageId, update: &StageUpdate) -> Result<(), AppError> {
        (**self).update_stage(stage, update)
    }
}

/// Blocking HTTP client for the task-workflow endpoints
pub struct HttpStagesClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStagesClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn overview_url(&self, project: ProjectId) -> String {
        format!("{}/task-workflow/stages/overview/project/{}", self.base_url, project)
    }

    pub fn stage_url(&self, stage: &StageId) -> String {
        format!("{}/task-workflow/stages/{}", self.base_url, stage)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl StagesApi for HttpStagesClient {
    fn stages_overview(&self, project: ProjectId) -> Result<Vec<Stage>, AppError> {
        let url = self.overview_url(project);
        debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send()?.error_for_status()?;
        let stages: Vec<Stage> = response.json()?;

        debug!("project {}: received {} stage(s)", project, stages.len());
        Ok(stages)
    }

    fn update_stage(&self, stage: &StageId, update: &StageUpdate) -> Result<(), AppError> {
        if update.is_empty() {
            return Err(AppError::Validation(format!("Empty update for stage {}", stage)));
        }

        let url = self.stage_url(stage);
        debug!("PUT {}", url);

        self.authorize(self.client.put(&url))
            .json(update)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_scoped_to_ids() {
        let config = ApiConfig {
            base_url: "http://api.example/api/".to_string(),
            ..Default::default()
        };
        let client = HttpStagesClient::new(&config).unwrap();
        assert_eq!(
            client.overview_url(ProjectId::new(42).unwrap()),
            "http://api.example/api/task-workflow/stages/overview/project/42"
        );
        assert_eq!(
            client.stage_url(&StageId::new("7")),
            "http://api.example/api/task-workflow/stages/7"
        );
    }

    #[test]
    fn test_empty_update_is_rejected_without_request() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let client = HttpStagesClient::new(&config).unwrap();
        let err = client.update_stage(&StageId::new("1"), &StageUpdate::default()).unwrap_err();
        assert!(err.is_validation());
    }
}
