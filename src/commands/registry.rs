use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct CommandUsage {
    pub syntax: &'static str,
    pub description: &'static str,
}

pub struct Command {
    pub name: &'static str,
    pub usages: &'static [CommandUsage],
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    /// The whole trimmed input line.
    pub input: &'a str,
    /// Everything after the command name, trimmed, with its original casing.
    pub args: &'a str,
}

impl<'a> CommandInvocation<'a> {
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.split_whitespace().nth(index)
    }

    pub fn args_len(&self) -> usize {
        self.args.split_whitespace().count()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "stream",
        usages: &[
            CommandUsage {
                syntax: "/stream on",
                description: "aktifkan streaming mode",
            },
            CommandUsage {
                syntax: "/stream off",
                description: "matikan streaming mode",
            },
        ],
        handler: super::handlers::core::handle_stream,
    },
    Command {
        name: "save",
        usages: &[CommandUsage {
            syntax: "/save [file]",
            description: "simpan riwayat chat",
        }],
        handler: super::handlers::io::handle_save,
    },
    Command {
        name: "learn",
        usages: &[CommandUsage {
            syntax: "/learn Kata = Arti",
            description: "ajarkan kosakata baru",
        }],
        handler: super::handlers::knowledge::handle_learn,
    },
    Command {
        name: "words",
        usages: &[CommandUsage {
            syntax: "/words",
            description: "tampilkan kosakata yang sudah dikenal",
        }],
        handler: super::handlers::knowledge::handle_words,
    },
    Command {
        name: "log",
        usages: &[CommandUsage {
            syntax: "/log [file]",
            description: "catat percakapan ke file / jeda pencatatan",
        }],
        handler: super::handlers::io::handle_log,
    },
    Command {
        name: "help",
        usages: &[CommandUsage {
            syntax: "/help",
            description: "tampilkan daftar perintah",
        }],
        handler: super::handlers::core::handle_help,
    },
    Command {
        name: "exit",
        usages: &[CommandUsage {
            syntax: "/exit",
            description: "keluar",
        }],
        handler: super::handlers::core::handle_exit,
    },
];
