use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_URL_ENV: &str = "QBANK_API_URL";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = "qbank.log";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid API base URL '{0}': expected an http or https URL")]
    InvalidUrl(String),
}

/// Client settings. The API base URL is the single place the backend address
/// is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub toast_seconds: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            toast_seconds: 4,
            log_file: None,
        }
    }
}

impl Config {
    /// Defaults, then `<data dir>/config.json`, then `QBANK_API_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let env_url = std::env::var(API_URL_ENV).ok();
        Self::load_from(&config_path(), env_url)
    }

    pub fn load_from(path: &Path, env_url: Option<String>) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Config::default()
        };

        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url;
        }

        config.api_base_url = normalize_base_url(&config.api_base_url)?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_seconds.max(1))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| data_dir().join(LOG_FILE_NAME))
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\qbank")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/qbank")
    }
}

pub fn config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE_NAME)
}
