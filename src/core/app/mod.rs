//! Runtime state of one chat session.

pub mod settings;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

pub use settings::{resolve_api_key, AppInitConfig, MissingApiKey, Settings};

use crate::api::ChatMessage;
use crate::core::chat_client::ChatClient;
use crate::core::config::data::Config;
use crate::core::conversation::{Conversation, HistoryError};
use crate::core::knowledge::{KnowledgeBase, KnowledgeError};
use crate::core::message::{Message, Role};
use crate::core::prompt::build_system_prompt;
use crate::utils::logging::LoggingState;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: String,
        source: std::io::Error,
    },
}

pub struct App {
    pub settings: Settings,
    pub knowledge: KnowledgeBase,
    pub conversation: Conversation,
    /// Mirrors `/stream on|off`; starts from [`Settings::stream`].
    pub stream_mode: bool,
    pub client: ChatClient,
    pub logging: LoggingState,
}

impl App {
    pub fn new(init: AppInitConfig, config: &Config, api_key: String) -> Result<Self, AppInitError> {
        let settings = Settings::resolve(&init, config);
        let knowledge = KnowledgeBase::load(&settings.knowledge_file)?;
        let conversation = Conversation::new(build_system_prompt(
            &settings.assistant_name,
            &knowledge,
        )?);

        let http = reqwest::Client::builder()
            .user_agent(concat!("kura/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        let client = ChatClient {
            http,
            base_url: settings.base_url.clone(),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
            referer: settings.referer.clone(),
            app_title: settings.app_title.clone(),
        };

        let mut logging = LoggingState::new(None);
        if let Some(path) = init.log_file {
            logging
                .start(path.clone())
                .map_err(|source| AppInitError::LogFile { path, source })?;
        }

        debug!(
            model = %settings.model,
            base_url = %settings.base_url,
            words = knowledge.len(),
            "session initialized"
        );

        Ok(Self {
            stream_mode: settings.stream,
            settings,
            knowledge,
            conversation,
            client,
            logging,
        })
    }

    /// Rebuilds entry 0 of the conversation from the current knowledge base.
    pub fn refresh_system_prompt(&mut self) -> Result<(), KnowledgeError> {
        let prompt = build_system_prompt(&self.settings.assistant_name, &self.knowledge)?;
        self.conversation.set_system_prompt(prompt);
        Ok(())
    }

    /// Persists a new vocabulary entry and makes it visible to the model on
    /// the next turn.
    pub fn learn(&mut self, word: &str, definition: &str) -> Result<(), KnowledgeError> {
        self.knowledge.learn(word, definition)?;
        self.refresh_system_prompt()
    }

    /// Appends the user entry and returns the full request payload.
    pub fn begin_turn(&mut self, text: impl Into<String>) -> Vec<ChatMessage> {
        self.conversation.push_user(text);
        self.conversation.api_messages()
    }

    /// Records the reply. The transcript log gets the user entry only now,
    /// so an abandoned turn never reaches it.
    pub fn complete_turn(&mut self, reply: impl Into<String>) {
        let pending_user = self
            .conversation
            .messages()
            .last()
            .filter(|message| message.role == Role::User)
            .cloned();
        if let Some(user) = pending_user {
            self.log(&user);
        }

        let message = Message::assistant(reply);
        self.log(&message);
        self.conversation.push_assistant(message.content);
    }

    /// Forgets the user entry of a turn that produced no reply.
    pub fn abandon_turn(&mut self) {
        if self.conversation.discard_pending_user().is_some() {
            debug!("discarded user entry of failed turn");
        }
    }

    /// Saves the transcript to `path`, or to the configured history file.
    pub fn save_history(&self, path: Option<&Path>) -> Result<PathBuf, HistoryError> {
        let target = path.unwrap_or(self.settings.history_file.as_path()).to_path_buf();
        self.conversation.save_transcript(&target)?;
        Ok(target)
    }

    fn log(&self, message: &Message) {
        if let Err(err) = self.logging.log_message(message) {
            warn!(error = %err, "failed to write transcript log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_app, create_test_settings};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn new_loads_knowledge_into_system_prompt() {
        let dir = TempDir::new().unwrap();
        let settings = create_test_settings(dir.path());
        fs::write(
            &settings.knowledge_file,
            r#"{"kosakata":{"Ambo":"Saya"}}"#,
        )
        .unwrap();
        let init = AppInitConfig {
            knowledge_file: Some(settings.knowledge_file.clone()),
            no_stream: true,
            ..Default::default()
        };

        let app = App::new(init, &Config::default(), "key".to_string()).unwrap();

        assert!(!app.stream_mode);
        assert_eq!(app.client.model, "openrouter/free");
        assert!(app.conversation.system_prompt().contains("\"Ambo\": \"Saya\""));
    }

    #[test]
    fn new_rejects_malformed_knowledge() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        let init = AppInitConfig {
            knowledge_file: Some(path),
            ..Default::default()
        };

        let result = App::new(init, &Config::default(), "key".to_string());

        assert!(matches!(result, Err(AppInitError::Knowledge(_))));
    }

    #[test]
    fn learn_regenerates_system_prompt_in_place() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(dir.path(), "http://127.0.0.1:9");
        app.begin_turn("Halo");
        app.complete_turn("Halo juo!");

        app.learn("Lapeh", "Lepas").unwrap();

        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("\"Lapeh\": \"Lepas\""));
        assert!(app.settings.knowledge_file.exists());
    }

    #[test]
    fn turns_append_user_then_assistant() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(dir.path(), "http://127.0.0.1:9");

        let payload = app.begin_turn("Apo arti 'indak'?");
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[1].content, "Apo arti 'indak'?");

        app.complete_turn("Indak artinya tidak.");
        let roles: Vec<_> = app
            .conversation
            .messages()
            .iter()
            .map(|message| message.role)
            .collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[test]
    fn abandoned_turn_leaves_no_dangling_user_entry() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(dir.path(), "http://127.0.0.1:9");

        app.begin_turn("pertanyaan yang gagal");
        app.abandon_turn();

        assert_eq!(app.conversation.messages().len(), 1);
    }

    #[test]
    fn log_flag_writes_started_marker() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("chat.log");
        let init = AppInitConfig {
            knowledge_file: Some(dir.path().join("k.json")),
            log_file: Some(log_path.to_string_lossy().to_string()),
            ..Default::default()
        };

        let app = App::new(init, &Config::default(), "key".to_string()).unwrap();

        assert!(app.logging.is_active());
        let contents = fs::read_to_string(&log_path).unwrap();
        assert!(contents.starts_with("## Logging started at "));
    }

    #[test]
    fn abandoned_turn_never_reaches_transcript_log() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("chat.log");
        let mut app = create_test_app(dir.path(), "http://127.0.0.1:9");
        app.logging
            .set_log_file(log_path.to_string_lossy().to_string())
            .unwrap();

        app.begin_turn("gagal");
        app.abandon_turn();
        app.begin_turn("Halo");
        app.complete_turn("Halo juo!");

        let contents = fs::read_to_string(&log_path).unwrap();
        assert_eq!(contents, "You: Halo\n\nHalo juo!\n\n");
    }

    #[test]
    fn save_history_defaults_to_configured_file() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(dir.path(), "http://127.0.0.1:9");
        app.begin_turn("Halo");
        app.complete_turn("Halo juo!");

        let saved = app.save_history(None).unwrap();
        assert_eq!(saved, app.settings.history_file);
        assert!(saved.exists());

        let custom = dir.path().join("custom.json");
        assert_eq!(app.save_history(Some(&custom)).unwrap(), custom);
    }
}
