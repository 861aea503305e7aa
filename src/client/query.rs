// Query layer: keyed cache and retry policy in front of a StagesApi

use crate::client::StagesApi;
use crate::error::AppError;
use crate::models::{ProjectId, Stage};
use log::{debug, warn};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Entity name used in stages overview cache keys
pub const STAGES_OVERVIEW: &str = "stagesOverview";

/// Cache key: entity name plus the project it is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub entity: &'static str,
    pub project: ProjectId,
}

impl QueryKey {
    pub fn stages_overview(project: ProjectId) -> Self {
        Self {
            entity: STAGES_OVERVIEW,
            project,
        }
    }
}

/// Exponential backoff for failed requests.
/// Only retryable errors (network/HTTP) are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based): `min(base * 2^attempt, max)`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

struct CacheEntry {
    stages: Vec<Stage>,
    fetched_at: Instant,
}

/// Caching front for a [`StagesApi`].
///
/// A fresh entry is served without touching the API; a miss, a stale entry or
/// an invalidated key issues exactly one logical request (plus retries).
/// Failed fetches are never cached.
pub struct QueryClient<A> {
    api: A,
    cache: HashMap<QueryKey, CacheEntry>,
    stale_time: Duration,
    retry: RetryPolicy,
    sleeper: Box<dyn Fn(Duration)>,
}

impl<A: StagesApi> QueryClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: HashMap::new(),
            stale_time: Duration::from_secs(60),
            retry: RetryPolicy::default(),
            sleeper: Box::new(std::thread::sleep),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Replace the backoff sleep (tests use a no-op)
    pub fn with_sleeper<F: Fn(Duration) + 'static>(mut self, sleeper: F) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Stages overview for `project`, from cache when fresh
    pub fn stages_overview(&mut self, project: ProjectId) -> Result<Vec<Stage>, AppError> {
        let key = QueryKey::stages_overview(project);

        if let Some(entry) = self.cache.get(&key) {
            if entry.fetched_at.elapsed() < self.stale_time {
                debug!("cache hit for {:?}", key);
                return Ok(entry.stages.clone());
            }
            debug!("cache entry for {:?} is stale", key);
        }

        let stages = self.fetch_with_retry(project)?;
        self.cache.insert(
            key,
            CacheEntry {
                stages: stages.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(stages)
    }

    fn fetch_with_retry(&self, project: ProjectId) -> Result<Vec<Stage>, AppError> {
        let mut attempt = 0;
        loop {
            match self.api.stages_overview(project) {
                Ok(stages) => return Ok(stages),
                Err(err) if err.is_retryable() && attempt < self.retry.retries => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "stages overview for project {} failed ({}); retry {}/{} in {:?}",
                        project,
                        err,
                        attempt + 1,
                        self.retry.retries,
                        delay
                    );
                    (self.sleeper)(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Drop one cached key; returns whether it was present
    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        self.cache.remove(key).is_some()
    }

    /// Drop every cached key scoped to `project`
    pub fn invalidate_project(&mut self, project: ProjectId) {
        self.cache.retain(|key, _| key.project != project);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn is_cached(&self, key: &QueryKey) -> bool {
        self.cache.contains_key(key)
    }
}
