//! Ordered role-tagged conversation log.
//!
//! Entry 0 is always the system prompt. It is replaced in place whenever the
//! knowledge base changes, so the model sees the refreshed vocabulary on the
//! next turn without the transcript growing.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::api::ChatMessage;
use crate::core::config::data::path_display;
use crate::core::message::{Message, Role};
use crate::utils::file::write_atomically;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to encode chat history: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write chat history to {}: {source}", path_display(.path))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.messages[0].content = prompt.into();
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Drops the trailing user entry of a turn whose reply never arrived.
    pub fn discard_pending_user(&mut self) -> Option<Message> {
        match self.messages.last() {
            Some(message) if message.role == Role::User => self.messages.pop(),
            _ => None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Everything after the system prompt.
    pub fn transcript(&self) -> &[Message] {
        &self.messages[1..]
    }

    pub fn api_messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(Message::to_api).collect()
    }

    /// Writes the transcript as a pretty JSON array; `[]` when nothing was said yet.
    pub fn save_transcript(&self, path: &Path) -> Result<(), HistoryError> {
        let contents = serde_json::to_string_pretty(self.transcript())?;
        write_atomically(path, contents.as_bytes()).map_err(|source| HistoryError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            entries = self.transcript().len(),
            "chat history saved"
        );
        Ok(())
    }
}
