//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod reply;
pub mod say;
pub mod vocabulary;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::chat::run_chat;
use crate::cli::say::run_say;
use crate::cli::vocabulary::{learn_word, list_words};
use crate::core::app::{AppInitConfig, Settings};
use crate::core::config::data::Config;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_DESCRIBE"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ")\nbuilt: ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    "\nrustc: ",
    env!("VERGEN_RUSTC_SEMVER"),
    " (",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    ")",
);

#[derive(Parser)]
#[command(name = "kura")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal chatbot that helps preserve the Minangkabau language")]
#[command(
    long_about = "Kura is a terminal chatbot backed by an OpenAI-compatible chat API \
(OpenRouter by default). Every conversation starts from a system prompt built \
from a JSON knowledge file, and new vocabulary can be taught while chatting.\n\n\
Environment Variables:\n\
  OPENROUTER_API_KEY  API key (OPENAI_API_KEY is used as a fallback)\n\
  KURA_LOG            Diagnostic log filter, e.g. 'debug' (falls back to RUST_LOG)\n\n\
A .env file in the working directory is read on startup.\n\n\
Commands:\n\
  /stream on|off      Toggle streaming replies\n\
  /save [file]        Save the chat history as JSON\n\
  /learn Kata = Arti  Teach a new word\n\
  /words              List known vocabulary\n\
  /log [file]         Enable or pause the transcript log\n\
  /exit               Quit (Ctrl+D works too)\n\n\
Ctrl+C stops a pending reply; at the prompt it quits."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for chat
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL of the chat API
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Knowledge file used to build the system prompt
    #[arg(short = 'k', long, global = true, value_name = "FILE")]
    pub knowledge: Option<PathBuf>,

    /// Default file for /save
    #[arg(long, global = true, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Wait for whole replies instead of streaming them
    #[arg(long, global = true)]
    pub no_stream: bool,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single prompt and print the reply
    Say {
        /// Prompt text; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the vocabulary in the knowledge file
    Words,
    /// Teach a word without starting a chat: `kura learn Ambo = Saya`
    Learn {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        entry: Vec<String>,
    },
    /// Set configuration values, or print them when no value is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Args {
    pub fn init_config(&self) -> AppInitConfig {
        AppInitConfig {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            knowledge_file: self.knowledge.clone(),
            history_file: self.history.clone(),
            no_stream: self.no_stream,
            log_file: self.log.clone(),
        }
    }
}

/// Applies `kura set <key> <value...>` to `config` and returns the
/// confirmation to print.
pub fn apply_set(config: &mut Config, key: &str, value: &[String]) -> Result<String, String> {
    let value = value.join(" ");
    config.set_value(key, &value)?;
    Ok(format!("✅ Set {key} to: {}", value.trim()))
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async_main());
    // A pending stdin read must not keep the process alive after /exit.
    runtime.shutdown_background();
    result
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    if let Err(e) = crate::logging::init() {
        eprintln!("⚠️  {e}");
    }

    let config = Config::load()?;
    let init = args.init_config();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            if let Err(e) = run_chat(init, &config).await {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Say { prompt } => run_say(prompt, init, &config).await,
        Commands::Words => {
            let settings = Settings::resolve(&init, &config);
            if let Err(e) = list_words(&settings.knowledge_file, &mut std::io::stdout()) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Learn { entry } => {
            let settings = Settings::resolve(&init, &config);
            if let Err(e) = learn_word(&settings.knowledge_file, &entry, &mut std::io::stdout()) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = config;
            match (key, value) {
                (Some(key), Some(value)) if !value.is_empty() => {
                    match apply_set(&mut config, &key, &value) {
                        Ok(message) => {
                            config.save()?;
                            println!("{message}");
                        }
                        Err(e) => {
                            eprintln!("❌ {e}");
                            std::process::exit(1);
                        }
                    }
                }
                _ => config.print_all(),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = config;
            if let Err(e) = config.unset_value(&key) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
    }
}
