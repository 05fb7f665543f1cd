//! Configuration management for Newscast

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Newline-delimited file of already-posted article identifiers
    pub dedup_file: String,
    /// JSON file holding the daily post counter and its window start
    pub ledger_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    pub endpoint: String,
    pub country: String,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Posts allowed per 24-hour window
    pub daily_cap: u32,
    /// Minimum seconds to wait when the provider throttles us
    pub throttle_floor_secs: u64,
    /// Maximum characters in a published post
    pub max_post_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between posting cycles
    pub cycle_interval_secs: u64,
    /// Granularity of the scheduler's idle sleep
    pub poll_interval_secs: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dedup_file: "~/.local/share/newscast/posted_news.txt".to_string(),
            ledger_file: "~/.local/share/newscast/post_ledger.json".to_string(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/top-headlines".to_string(),
            country: "us".to_string(),
            page_size: 20,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            daily_cap: 17,
            throttle_floor_secs: 60,
            max_post_chars: 280,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: 90 * 60,
            poll_interval_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state: StateConfig::default(),
            news: NewsConfig::default(),
            limits: LimitsConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to the
    /// compiled-in defaults when no config file exists.
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }
}

impl StateConfig {
    /// Expand the dedup file path (tilde and env vars)
    pub fn expand_dedup_path(&self) -> Result<PathBuf> {
        expand_path(&self.dedup_file)
    }

    /// Expand the ledger file path (tilde and env vars)
    pub fn expand_ledger_path(&self) -> Result<PathBuf> {
        expand_path(&self.ledger_file)
    }
}

fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| ConfigError::MissingField(format!("cannot expand path {}: {}", raw, e)))?;
    Ok(PathBuf::from(expanded.to_string()))
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("NEWSCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("newscast").join("config.toml"))
}
