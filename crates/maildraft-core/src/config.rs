use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result, anyhow};

use crate::draft::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Optional overrides read from `<config_dir>/maildraft/config.json`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
    pub download_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the user config; a missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// `None` leaves the transport's default in place.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Where saved drafts go: the configured directory, else the user's
    /// downloads folder, else the working directory.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("maildraft"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}

/// Read the API credential from the environment.
///
/// Blank values count as missing.
pub fn api_key_from_env() -> Result<String> {
    api_key_from(std::env::var(API_KEY_ENV).ok())
}

fn api_key_from(value: Option<String>) -> Result<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        Some(_) => Err(anyhow!("{} is set but empty", API_KEY_ENV)),
        None => Err(anyhow!(
            "{} is not set; export it or add it to a .env file",
            API_KEY_ENV
        )),
    }
}
