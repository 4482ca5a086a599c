//! Kura is a terminal chatbot that helps preserve the Minangkabau language.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the vocabulary knowledge base, the system
//!   prompt builder, the conversation log, configuration, and the chat
//!   completion client (buffered and streaming).
//! - [`commands`] implements slash-command parsing and command execution used
//!   by the chat loop.
//! - [`cli`] parses arguments and runs the interactive loop and the one-shot
//!   entrypoints.
//! - [`api`] defines the chat-completion payloads sent to and received from
//!   the remote API.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod utils;
