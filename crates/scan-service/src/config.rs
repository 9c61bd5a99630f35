use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_phishing_model")]
    pub phishing_model: String,
    #[serde(default = "default_logs_model")]
    pub logs_model: String,
    #[serde(default = "default_logs_thinking_budget")]
    pub logs_thinking_budget: Option<u32>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            phishing_model: default_phishing_model(),
            logs_model: default_logs_model(),
            logs_thinking_budget: default_logs_thinking_budget(),
            timeout_ms: None,
        }
    }
}

impl ModelConfig {
    /// Key from the config file, else from the process environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        let configured = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);
        configured.or_else(|| {
            API_KEY_ENV_VARS
                .iter()
                .filter_map(|name| lookup(name))
                .map(|key| key.trim().to_string())
                .find(|key| !key.is_empty())
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhishingConfig {
    /// Ask the model to ground its verdict with web search citations.
    #[serde(default)]
    pub grounding: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_phishing_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_logs_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_logs_thinking_budget() -> Option<u32> {
    Some(16384)
}
