//! Non-interactive "say" command

use std::error::Error;
use std::io::{self, Write};

use crate::cli::reply::{ctrl_c, fetch_buffered, fetch_streaming, Reply, TurnError};
use crate::core::app::{resolve_api_key, App, AppInitConfig};
use crate::core::config::data::Config;

pub async fn run_say(
    prompt: Vec<String>,
    init: AppInitConfig,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: kura say <prompt>");
        std::process::exit(1);
    }

    let api_key = resolve_api_key()?;
    let mut app = App::new(init, config, api_key)?;

    let mut out = io::stdout();
    match say_once(&mut app, &prompt, &mut out).await {
        Ok(_) => Ok(()),
        Err(TurnError::Chat(err)) => {
            eprintln!("❌ Error: {err}");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

/// One turn against the knowledge-backed system prompt, printed bare.
pub async fn say_once<W: Write>(
    app: &mut App,
    prompt: &str,
    out: &mut W,
) -> Result<Reply, TurnError> {
    let messages = app.begin_turn(prompt.trim());

    let result = if app.stream_mode {
        fetch_streaming(&app.client, messages, out, ctrl_c()).await
    } else {
        fetch_buffered(&app.client, messages, out, ctrl_c()).await
    };

    match &result {
        Ok(reply) if !reply.text.is_empty() => app.complete_turn(reply.text.clone()),
        _ => app.abandon_turn(),
    }
    result
}
