// Process configuration, built once at startup and passed down by reference

use crate::error::AppError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_RETRIES: u32 = 3;

/// Backend API settings
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    /// Retries after a failed fetch
    pub retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            retries: DEFAULT_API_RETRIES,
        }
    }
}

/// Client configuration
///
/// Resolution order for each key: environment variable, then the `rc` file in
/// the config directory, then the built-in default.
///
/// | rc key          | env var         | default                      |
/// |-----------------|-----------------|------------------------------|
/// | `api.url`       | `PCQ_API_URL`   | `http://localhost:3000/api`  |
/// | `api.token`     | `PCQ_API_TOKEN` | none                         |
/// | `api.timeout`   |                 | 30 (seconds)                 |
/// | `api.retries`   |                 | 3                            |
/// | `data.location` |                 | `<config dir>/state.db`      |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_dir: PathBuf,
    pub api: ApiConfig,
    pub data_location: PathBuf,
}

impl AppConfig {
    /// Config directory: `$PCQ_HOME` if set, otherwise `~/.pcq`
    pub fn default_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("PCQ_HOME") {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".pcq"))
    }

    /// Load from the default directory and the process environment
    pub fn load() -> Result<Self> {
        let dir = Self::default_dir()?;
        Self::load_from(&dir, |key| std::env::var(key).ok())
    }

    /// Load from `dir`, reading environment overrides through `env`
    pub fn load_from<F>(dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rc_path = dir.join("rc");
        let rc = if rc_path.exists() {
            let content = std::fs::read_to_string(&rc_path)
                .with_context(|| format!("Failed to read config file: {}", rc_path.display()))?;
            parse_rc(&content)
        } else {
            HashMap::new()
        };

        let mut api = ApiConfig::default();
        if let Some(url) = env("PCQ_API_URL").or_else(|| rc.get("api.url").cloned()) {
            api.base_url = url.trim_end_matches('/').to_string();
        }
        api.token = env("PCQ_API_TOKEN")
            .or_else(|| rc.get("api.token").cloned())
            .filter(|t| !t.is_empty());
        if let Some(secs) = rc.get("api.timeout") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("Invalid api.timeout in {}: '{}'", rc_path.display(), secs))?;
            api.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = rc.get("api.retries") {
            api.retries = retries
                .parse()
                .with_context(|| format!("Invalid api.retries in {}: '{}'", rc_path.display(), retries))?;
        }

        // Relative data locations resolve against the config directory
        let data_location = match rc.get("data.location") {
            Some(path) => {
                let path = PathBuf::from(path);
                if path.is_relative() {
                    dir.join(path)
                } else {
                    path
                }
            }
            None => dir.join("state.db"),
        };

        Ok(Self {
            config_dir: dir.to_path_buf(),
            api,
            data_location,
        })
    }
}

fn parse_rc(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// PostgreSQL connection settings for administrative scripts.
/// Only the environment is consulted; see [`DbConfig::from_lookup`].
#[derive(Clone, PartialEq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "project_cost_quality".to_string(),
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl DbConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`,
    /// falling back to the defaults for unset or empty variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("DB_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::Validation(format!("Invalid DB_PORT: '{}'. Port must be a number between 1 and 65535.", raw))
            })?,
            None => defaults.port,
        };
        if port == 0 {
            return Err(AppError::Validation("Invalid DB_PORT: 0".to_string()));
        }

        Ok(Self {
            host: get("DB_HOST").unwrap_or(defaults.host),
            port,
            user: get("DB_USER").unwrap_or(defaults.user),
            password: get("DB_PASSWORD").unwrap_or(defaults.password),
            database: get("DB_NAME").unwrap_or(defaults.database),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_rc() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(temp_dir.path(), no_env).unwrap();
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.data_location, temp_dir.path().join("state.db"));
    }

    #[test]
    fn test_rc_values_and_env_override() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("rc"),
            "# comment\napi.url=http://rc.example/api/\napi.token=abc\napi.timeout=5\napi.retries=0\ndata.location=./custom.db\n",
        )
        .unwrap();

        let config = AppConfig::load_from(temp_dir.path(), no_env).unwrap();
        assert_eq!(config.api.base_url, "http://rc.example/api");
        assert_eq!(config.api.token.as_deref(), Some("abc"));
        assert_eq!(config.api.timeout, Duration::from_secs(5));
        assert_eq!(config.api.retries, 0);
        assert_eq!(config.data_location, temp_dir.path().join("./custom.db"));

        let config = AppConfig::load_from(temp_dir.path(), |key| match key {
            "PCQ_API_URL" => Some("http://env.example".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api.base_url, "http://env.example");
    }

    #[test]
    fn test_bad_timeout_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("rc"), "api.timeout=soon\n").unwrap();
        assert!(AppConfig::load_from(temp_dir.path(), no_env).is_err());
    }

    #[test]
    fn test_db_config_defaults() {
        let config = DbConfig::from_lookup(no_env).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.user, "postgres");
        assert_eq!(config.password, "postgres");
        assert_eq!(config.database, "project_cost_quality");
    }

    #[test]
    fn test_db_config_from_env() {
        let config = DbConfig::from_lookup(|key| match key {
            "DB_HOST" => Some("db.internal".to_string()),
            "DB_PORT" => Some("6543".to_string()),
            "DB_NAME" => Some("pcq".to_string()),
            "DB_USER" => Some(String::new()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.database, "pcq");
        assert_eq!(config.user, "postgres");
    }

    #[test]
    fn test_db_config_rejects_bad_port() {
        let err = DbConfig::from_lookup(|key| (key == "DB_PORT").then(|| "abc".to_string())).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_db_config_debug_hides_password() {
        let debug = format!("{:?}", DbConfig::default());
        assert_eq!(debug.matches("\"postgres\"").count(), 1);
        assert!(debug.contains("***"));
    }
}
