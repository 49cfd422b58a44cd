//! Client configuration.
//!
//! Loaded from TOML; every field is optional in the file. Resolution order is
//! an explicit path, then `TASKLIST_CONFIG`, then built-in defaults, with
//! `TASKLIST_BASE_URL` applied last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{TodoClient, DEFAULT_USER_ID};
use crate::error::ConfigError;
use crate::types::{FilterOption, SortOption};

pub const CONFIG_PATH_ENV: &str = "TASKLIST_CONFIG";
pub const BASE_URL_ENV: &str = "TASKLIST_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_id: i64,
    pub timeout_secs: u64,
    pub default_filter: FilterOption,
    pub default_sort: SortOption,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID,
            timeout_secs: 10,
            default_filter: FilterOption::All,
            default_sort: SortOption::Id,
        }
    }
}

impl ClientConfig {
    /// Resolve configuration from `path`, the environment, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        let config = match path {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.with_env_overrides().validated()
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            self.base_url = url;
        }
        self
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn client(&self) -> TodoClient {
        TodoClient::new(&self.base_url).with_user_id(self.user_id)
    }
}
