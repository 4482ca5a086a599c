use std::path::Path;

use tracing::warn;

use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::App;
use crate::utils::logging::timestamp;

const USAGE_SAVE: &str = "[System] Usage: /save [file]";
const USAGE_LOG: &str = "[System] Usage: /log [file]";

pub(crate) fn handle_save(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args_len() > 1 {
        return CommandResult::Continue(USAGE_SAVE.to_string());
    }

    match app.save_history(invocation.arg(0).map(Path::new)) {
        Ok(path) => CommandResult::Continue(format!(
            "\n[System] Chat history saved to {}\n",
            path.display()
        )),
        Err(err) => {
            warn!(error = %err, "saving chat history failed");
            CommandResult::Continue(format!("[System] Error: {err}"))
        }
    }
}

pub(crate) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match invocation.args_len() {
        0 => {
            let was_active = app.logging.is_active();
            let log_message = if was_active {
                format!("Logging paused at {}", timestamp())
            } else {
                format!("Logging resumed at {}", timestamp())
            };
            match app.logging.toggle_logging(&log_message) {
                Ok(status) => {
                    // The pause marker is written by the toggle itself.
                    if !was_active {
                        if let Err(err) = app.logging.log_marker(&log_message) {
                            warn!(error = %err, "failed to write transcript log");
                        }
                    }
                    CommandResult::Continue(format!("[System] {status}"))
                }
                Err(err) => CommandResult::Continue(format!("[System] Log error: {err}")),
            }
        }
        1 => {
            let filename = invocation.args;
            match app.logging.start(filename.to_string()) {
                Ok(status) => CommandResult::Continue(format!("[System] {status}")),
                Err(err) => CommandResult::Continue(format!("[System] Logfile error: {err}")),
            }
        }
        _ => CommandResult::Continue(USAGE_LOG.to_string()),
    }
}
