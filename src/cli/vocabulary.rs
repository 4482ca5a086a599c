//! `kura words` and `kura learn`, which edit the knowledge file without
//! contacting the model.

use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::core::knowledge::{KnowledgeBase, KnowledgeError};

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Expected: kura learn <word> = <definition>")]
    MissingSeparator,

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    Output(#[from] io::Error),
}

pub fn list_words<W: Write>(knowledge_file: &Path, out: &mut W) -> Result<(), VocabularyError> {
    let knowledge = KnowledgeBase::load(knowledge_file)?;
    if knowledge.is_empty() {
        writeln!(out, "No vocabulary in {}", knowledge_file.display())?;
        return Ok(());
    }

    writeln!(
        out,
        "{} entries in {}:",
        knowledge.len(),
        knowledge_file.display()
    )?;
    for (word, definition) in knowledge.kosakata() {
        writeln!(out, "  {word} = {definition}")?;
    }
    Ok(())
}

/// `entry` is the raw argument list, joined and split on the first `=`.
pub fn learn_word<W: Write>(
    knowledge_file: &Path,
    entry: &[String],
    out: &mut W,
) -> Result<(), VocabularyError> {
    let entry = entry.join(" ");
    let (word, definition) = entry
        .split_once('=')
        .ok_or(VocabularyError::MissingSeparator)?;

    let mut knowledge = KnowledgeBase::load(knowledge_file)?;
    knowledge.learn(word, definition)?;
    info!(word = word.trim(), file = %knowledge_file.display(), "learned word");

    writeln!(out, "✅ Learned '{}'", word.trim())?;
    Ok(())
}
