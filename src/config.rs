//! Tool configuration: API credentials from `config.yaml` or the environment.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const EXAMPLE_CONFIG_PATH: &str = "config.yaml.example";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api_keys: ApiKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeys {
    pub shodan: String,
}

impl Settings {
    /// Loads settings with `SHODAN_API_KEY` taking precedence over the
    /// config file. The file path can be overridden with
    /// `RECONCHAT_CONFIG`.
    pub fn load() -> Result<Self> {
        if let Some(key) = env_var("SHODAN_API_KEY") {
            return Ok(Self {
                api_keys: ApiKeys { shodan: key },
            });
        }

        let path = env_var("RECONCHAT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!(
                "Config file '{}' not found. Copy '{}' and fill in your Shodan API key, \
or set SHODAN_API_KEY in the environment.",
                path.display(),
                EXAMPLE_CONFIG_PATH
            ));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let settings: Settings =
            serde_yaml::from_str(contents).context("Invalid YAML in configuration")?;
        if settings.api_keys.shodan.trim().is_empty() {
            return Err(anyhow!("api_keys.shodan is empty in configuration"));
        }
        Ok(settings)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
