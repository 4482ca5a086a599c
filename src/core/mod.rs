pub mod app;
pub mod chat_client;
pub mod chat_stream;
pub mod config;
pub mod conversation;
pub mod knowledge;
pub mod message;
pub mod prompt;
