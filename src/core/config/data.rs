use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Model id sent with every request (e.g., "openrouter/free")
    pub model: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Print replies incrementally as they arrive
    pub stream: Option<bool>,
    /// Name the assistant introduces itself with in the system prompt
    pub assistant_name: Option<String>,
    /// Path of the vocabulary knowledge file, relative to the working directory
    pub knowledge_file: Option<String>,
    /// Default target of `/save`
    pub history_file: Option<String>,
    /// OpenRouter attribution (`HTTP-Referer`)
    pub referer: Option<String>,
    /// OpenRouter attribution (`X-Title`)
    pub app_title: Option<String>,
}

/// Keys accepted by `kura set` and `kura unset`.
pub const SETTING_KEYS: &[&str] = &[
    "model",
    "base-url",
    "temperature",
    "stream",
    "assistant-name",
    "knowledge-file",
    "history-file",
    "referer",
    "app-title",
];

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("expected on or off, got '{value}'")),
    }
}

impl Config {
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("a value is required for {key}"));
        }
        let text = Some(value.to_string());
        match key {
            "model" => self.model = text,
            "base-url" => self.base_url = text,
            "temperature" => {
                let temperature: f64 = value
                    .parse()
                    .map_err(|_| format!("temperature must be a number, got '{value}'"))?;
                if !(0.0..=2.0).contains(&temperature) {
                    return Err(format!("temperature must be between 0 and 2, got {value}"));
                }
                self.temperature = Some(temperature);
            }
            "stream" => self.stream = Some(parse_bool(value)?),
            "assistant-name" => self.assistant_name = text,
            "knowledge-file" => self.knowledge_file = text,
            "history-file" => self.history_file = text,
            "referer" => self.referer = text,
            "app-title" => self.app_title = text,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), String> {
        match key {
            "model" => self.model = None,
            "base-url" => self.base_url = None,
            "temperature" => self.temperature = None,
            "stream" => self.stream = None,
            "assistant-name" => self.assistant_name = None,
            "knowledge-file" => self.knowledge_file = None,
            "history-file" => self.history_file = None,
            "referer" => self.referer = None,
            "app-title" => self.app_title = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key: {key} (expected one of: {})",
        SETTING_KEYS.join(", ")
    )
}
