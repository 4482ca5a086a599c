use tracing::warn;

use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::App;

const USAGE_LEARN: &str = "AI: Format salah. Gunakan: /learn Kata = Arti";

pub(crate) fn handle_learn(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let Some((word, definition)) = invocation.args.split_once('=') else {
        return CommandResult::Continue(USAGE_LEARN.to_string());
    };
    let word = word.trim();

    match app.learn(word, definition) {
        Ok(()) => CommandResult::Continue(format!(
            "AI: Kosakata '{word}' berhasil ditambahkan! 🎉"
        )),
        Err(err) => {
            warn!(error = %err, "learning vocabulary failed");
            CommandResult::Continue(format!(
                "AI: Terjadi kesalahan saat belajar.\n{err}"
            ))
        }
    }
}

pub(crate) fn handle_words(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if app.knowledge.is_empty() {
        return CommandResult::Continue(
            "[System] Belum ada kosakata. Ajarkan dengan /learn Kata = Arti".to_string(),
        );
    }

    let mut listing = format!("[System] {} kosakata:\n", app.knowledge.len());
    for (word, definition) in app.knowledge.kosakata() {
        listing.push_str(&format!("  {word} = {definition}\n"));
    }
    CommandResult::Continue(listing)
}
