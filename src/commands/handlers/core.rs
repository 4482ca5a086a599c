use crate::commands::registry::CommandInvocation;
use crate::commands::{command_overview, CommandResult};
use crate::core::app::App;

const USAGE_STREAM: &str = "[System] Usage: /stream on | /stream off";

pub(crate) fn handle_help(_app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args_len() > 0 {
        return CommandResult::ProcessAsMessage(invocation.input.to_string());
    }
    CommandResult::Continue(command_overview())
}

/// Only a bare `/exit` quits; `/exit <text>` goes to the model.
pub(crate) fn handle_exit(_app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args_len() > 0 {
        return CommandResult::ProcessAsMessage(invocation.input.to_string());
    }
    CommandResult::Exit("AI: Byee 👋".to_string())
}

pub(crate) fn handle_stream(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let label = |on: bool| if on { "ON" } else { "OFF" };

    if invocation.args_len() > 1 {
        return CommandResult::Continue(USAGE_STREAM.to_string());
    }
    match invocation.arg(0).map(str::to_ascii_lowercase).as_deref() {
        Some("on") => app.stream_mode = true,
        Some("off") => app.stream_mode = false,
        None => {
            return CommandResult::Continue(format!(
                "[System] Streaming mode is {}. Usage: /stream on | /stream off\n",
                label(app.stream_mode)
            ))
        }
        Some(_) => return CommandResult::Continue(USAGE_STREAM.to_string()),
    }

    CommandResult::Continue(format!(
        "[System] Streaming mode: {}\n",
        label(app.stream_mode)
    ))
}
