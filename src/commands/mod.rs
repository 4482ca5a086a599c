//! Slash-command parsing and dispatch for the chat loop.
//!
//! Input that is not a known command (including unknown `/foo` lines) is handed
//! back as [`CommandResult::ProcessAsMessage`] and sent to the model.

mod handlers;
mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation, CommandUsage};

use crate::core::app::App;

pub const EMPTY_INPUT_NOTICE: &str = "[System] (kosong, ketik sesuatu atau /exit)";

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Handled; print the text when it is not empty.
    Continue(String),
    ProcessAsMessage(String),
    /// Leave the chat loop after printing the farewell.
    Exit(String),
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return CommandResult::Continue(EMPTY_INPUT_NOTICE.to_string());
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(trimmed.to_string());
    };

    let (command_name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match find_command(command_name) {
        Some(command) => (command.handler)(
            app,
            CommandInvocation {
                input: trimmed,
                args,
            },
        ),
        None => CommandResult::ProcessAsMessage(trimmed.to_string()),
    }
}

/// The command list printed at startup and by `/help`.
pub fn command_overview() -> String {
    let mut overview = String::from("Commands:\n");
    for command in all_commands() {
        for usage in command.usages {
            overview.push_str(&format!(
                "  {:<20} -> {}\n",
                usage.syntax, usage.description
            ));
        }
    }
    overview
}
