use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;
use crate::protocol::Metric;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "TUBESTATS_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the stats API lives and how to talk to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. The client never retries on its own.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `limit` sent with the channel listing.
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    /// `limit` sent with a channel's history.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub default_sort: Metric,
    #[serde(default)]
    pub default_metric: Metric,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            list_limit: default_list_limit(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_sort: Metric::SubscriberCount,
            default_metric: Metric::SubscriberCount,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_list_limit() -> u32 {
    100
}

fn default_history_limit() -> u32 {
    30
}

impl Config {
    /// Load from the default location, writing defaults on first run, then
    /// apply the environment override.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Blank values are ignored.
    pub fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
