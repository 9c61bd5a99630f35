use anyhow::Context;
use scan_service::{ModelConfig, PhishingConfig, HISTORY_FILE_NAME};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) model: ModelConfig,
    #[serde(default)]
    pub(crate) phishing: PhishingConfig,
    #[serde(default)]
    pub(crate) history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryConfig {
    #[serde(default = "default_history_path")]
    pub(crate) path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
        }
    }
}

fn default_history_path() -> PathBuf {
    PathBuf::from("data").join(HISTORY_FILE_NAME)
}

fn validate_config(config: &Config) -> anyhow::Result<()> {
    if config.model.base_url.trim().is_empty() {
        anyhow::bail!("model.base_url must not be empty");
    }
    if config.model.phishing_model.trim().is_empty() {
        anyhow::bail!("model.phishing_model must not be empty");
    }
    if config.model.logs_model.trim().is_empty() {
        anyhow::bail!("model.logs_model must not be empty");
    }
    if config.model.timeout_ms == Some(0) {
        anyhow::bail!("model.timeout_ms must be greater than 0 (omit it to wait indefinitely)");
    }
    if config.history.path.as_os_str().is_empty() {
        anyhow::bail!("history.path must not be empty");
    }
    Ok(())
}

/// A missing file means all defaults; a present but invalid file is an error.
pub(crate) fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "config not found, using defaults");
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}
