use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// API root, e.g. `https://rt05.example.id/api`
    pub base_url: String,
    #[serde(default)]
    pub vim_mode: bool,
    /// Role sent to the demo login endpoint; enables Ctrl+D on the login form
    #[serde(default)]
    pub demo_role: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// Background refresh interval of the visible tab (0 disables it)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_max_concurrent_requests() -> usize {
    6
}

fn default_refresh_interval_secs() -> u64 {
    60
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(raw)?;
        if config.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.refresh_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Determine the config file path with fallback logic
pub fn get_config_path(cli_path: Option<String>) -> Result<PathBuf> {
    // If CLI argument provided, use it
    if let Some(path) = cli_path {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        anyhow::bail!("Config file not found at specified path: {}", path);
    }

    // Try ~/.config/wargatui/config.yaml
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("wargatui").join("config.yaml");
        if config_path.exists() {
            return Ok(config_path);
        }
    }

    // Fallback to ./config.yaml
    let local_config = PathBuf::from("config.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }

    let expected_path = dirs::config_dir()
        .map(|dir| dir.join("wargatui").join("config.yaml").display().to_string())
        .unwrap_or_else(|| "~/.config/wargatui/config.yaml".to_string());

    anyhow::bail!(
        "Config file not found. Expected locations:\n\
         1. {} (preferred)\n\
         2. ./config.yaml (fallback)\n\
         \n\
         Use --config <path> to specify a custom location.",
        expected_path
    )
}
