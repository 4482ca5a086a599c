//! File-backed Minangkabau vocabulary store.
//!
//! The knowledge file is a JSON object whose `kosakata` member maps a word to
//! its definition. Other top-level members are carried through untouched so
//! they keep appearing in the system prompt. Key order is preserved.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::core::config::data::path_display;
use crate::utils::file::write_atomically;

/// Top-level key holding the vocabulary mapping.
pub const VOCABULARY_KEY: &str = "kosakata";

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge file {}: {source}", path_display(.path))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse knowledge file {}: {source}", path_display(.path))]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("knowledge file {} must contain a JSON object", path_display(.path))]
    NotAnObject { path: PathBuf },

    #[error("`kosakata` in {} must be a JSON object", path_display(.path))]
    VocabularyNotAnObject { path: PathBuf },

    #[error("word must not be empty")]
    EmptyWord,

    #[error("failed to write knowledge file {}: {source}", path_display(.path))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode knowledge: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    path: PathBuf,
    document: Map<String, Value>,
}

impl KnowledgeBase {
    /// Loads the knowledge file. A missing file yields an empty vocabulary
    /// bound to `path`; the file is created on the first [`learn`](Self::learn).
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, KnowledgeError> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "knowledge file missing, starting empty");
            return Ok(Self::empty(path));
        }

        let contents = fs::read_to_string(&path).map_err(|source| KnowledgeError::Read {
            path: path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&contents).map_err(|source| KnowledgeError::Parse {
                path: path.clone(),
                source,
            })?;
        let Value::Object(document) = value else {
            return Err(KnowledgeError::NotAnObject { path });
        };
        if let Some(vocabulary) = document.get(VOCABULARY_KEY) {
            if !vocabulary.is_object() {
                return Err(KnowledgeError::VocabularyNotAnObject { path });
            }
        }

        let knowledge = Self { path, document };
        debug!(
            path = %knowledge.path.display(),
            words = knowledge.len(),
            "knowledge file loaded"
        );
        Ok(knowledge)
    }

    pub fn empty(path: impl Into<PathBuf>) -> Self {
        let mut document = Map::new();
        document.insert(VOCABULARY_KEY.to_string(), Value::Object(Map::new()));
        Self {
            path: path.into(),
            document,
        }
    }

    /// Vocabulary entries in file order. Non-string definitions are rendered
    /// as compact JSON.
    pub fn kosakata(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.document
            .get(VOCABULARY_KEY)
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|words| words.iter())
            .map(|(word, definition)| {
                let definition = match definition {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (word.as_str(), definition)
            })
    }

    pub fn len(&self) -> usize {
        self.document
            .get(VOCABULARY_KEY)
            .and_then(Value::as_object)
            .map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn definition(&self, word: &str) -> Option<&str> {
        self.document
            .get(VOCABULARY_KEY)?
            .get(word)?
            .as_str()
    }

    /// Adds or replaces `word` and persists the whole document. On a write
    /// failure the in-memory vocabulary is left as it was.
    pub fn learn(&mut self, word: &str, definition: &str) -> Result<(), KnowledgeError> {
        let word = word.trim();
        let definition = definition.trim();
        if word.is_empty() {
            return Err(KnowledgeError::EmptyWord);
        }

        let mut updated = self.document.clone();
        let vocabulary = updated
            .entry(VOCABULARY_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(words) = vocabulary else {
            return Err(KnowledgeError::VocabularyNotAnObject {
                path: self.path.clone(),
            });
        };
        words.insert(word.to_string(), Value::String(definition.to_string()));

        write_document(&self.path, &updated)?;
        self.document = updated;
        debug!(word, path = %self.path.display(), "vocabulary entry learned");
        Ok(())
    }

    pub fn save(&self) -> Result<(), KnowledgeError> {
        write_document(&self.path, &self.document)
    }

    /// Two-space indented JSON with non-ASCII text written verbatim.
    pub fn to_pretty_json(&self) -> Result<String, KnowledgeError> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }
}

fn write_document(path: &Path, document: &Map<String, Value>) -> Result<(), KnowledgeError> {
    let contents = serde_json::to_string_pretty(document)?;
    write_atomically(path, contents.as_bytes()).map_err(|source| KnowledgeError::Write {
        path: path.to_path_buf(),
        source,
    })
}
