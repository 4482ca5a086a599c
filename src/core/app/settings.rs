use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::data::Config;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_VARS: &[&str] = &["OPENROUTER_API_KEY", "OPENAI_API_KEY"];

#[derive(Debug, Error)]
#[error(
    "No API key found. Set OPENROUTER_API_KEY (or OPENAI_API_KEY) in the environment or in a .env file.\n\
     Example: echo 'OPENROUTER_API_KEY=sk-or-...' >> .env"
)]
pub struct MissingApiKey;

/// Values given on the command line. They take precedence over the config
/// file, which takes precedence over built-in defaults.
#[derive(Debug, Default, Clone)]
pub struct AppInitConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub knowledge_file: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
    pub no_stream: bool,
    pub log_file: Option<String>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub stream: bool,
    pub assistant_name: String,
    pub knowledge_file: PathBuf,
    pub history_file: PathBuf,
    pub referer: Option<String>,
    pub app_title: Option<String>,
}

impl Settings {
    pub fn resolve(init: &AppInitConfig, config: &Config) -> Self {
        Self {
            model: init
                .model
                .clone()
                .unwrap_or_else(|| config.model_or_default().to_string()),
            base_url: init
                .base_url
                .clone()
                .unwrap_or_else(|| config.base_url_or_default().to_string()),
            temperature: config.temperature_or_default(),
            stream: !init.no_stream && config.stream_or_default(),
            assistant_name: config.assistant_name_or_default().to_string(),
            knowledge_file: init
                .knowledge_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(config.knowledge_file_or_default())),
            history_file: init
                .history_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(config.history_file_or_default())),
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
        }
    }
}

pub fn resolve_api_key() -> Result<String, MissingApiKey> {
    resolve_api_key_with(|name| std::env::var(name).ok())
}

/// First non-blank value among [`API_KEY_VARS`].
pub fn resolve_api_key_with(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, MissingApiKey> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(MissingApiKey)
}
