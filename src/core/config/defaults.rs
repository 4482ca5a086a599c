use crate::core::config::data::Config;
use crate::core::prompt::DEFAULT_ASSISTANT_NAME;

pub const DEFAULT_MODEL: &str = "openrouter/free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_KNOWLEDGE_FILE: &str = "minangkabau_knowledge.json";
pub const DEFAULT_HISTORY_FILE: &str = "chat_history.json";

impl Config {
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn stream_or_default(&self) -> bool {
        self.stream.unwrap_or(true)
    }

    pub fn assistant_name_or_default(&self) -> &str {
        self.assistant_name.as_deref().unwrap_or(DEFAULT_ASSISTANT_NAME)
    }

    pub fn knowledge_file_or_default(&self) -> &str {
        self.knowledge_file
            .as_deref()
            .unwrap_or(DEFAULT_KNOWLEDGE_FILE)
    }

    pub fn history_file_or_default(&self) -> &str {
        self.history_file.as_deref().unwrap_or(DEFAULT_HISTORY_FILE)
    }
}
