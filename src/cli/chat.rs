//! The interactive `You:` / `AI:` loop.

use std::error::Error;
use std::future::Future;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::reply::{ctrl_c, fetch_buffered, fetch_streaming, TurnError};
use crate::commands::{command_overview, process_input, CommandResult};
use crate::core::app::{resolve_api_key, App, AppInitConfig};
use crate::core::config::data::Config;

const BANNER: &str = " Welcome to Your First AI Chatbot on Terminal\n";
const INTERRUPTED_NOTICE: &str = "[System] Response interrupted.";

pub async fn run_chat(init: AppInitConfig, config: &Config) -> Result<(), Box<dyn Error>> {
    let api_key = resolve_api_key()?;
    let mut app = App::new(init, config, api_key)?;

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut out = io::stdout();
    run_loop(&mut app, &mut reader, &mut out, ctrl_c).await?;
    Ok(())
}

/// Runs until `/exit`, end of input, or `interrupt` fires at the prompt.
/// While a reply is pending, `interrupt` stops only that reply.
pub async fn run_loop<R, W, I, F>(
    app: &mut App,
    reader: &mut R,
    out: &mut W,
    interrupt: I,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    I: Fn() -> F,
    F: Future<Output = ()>,
{
    writeln!(out, "{BANNER}")?;
    writeln!(out, "{}", command_overview())?;

    let mut line = String::new();
    loop {
        write!(out, "You: ")?;
        out.flush()?;

        line.clear();
        let read = tokio::select! {
            read = reader.read_line(&mut line) => read?,
            _ = interrupt() => 0,
        };
        let input = if read == 0 {
            // End of input counts as `/exit`.
            writeln!(out)?;
            "/exit"
        } else {
            line.as_str()
        };

        match process_input(app, input) {
            CommandResult::Continue(text) => {
                if !text.is_empty() {
                    writeln!(out, "{text}")?;
                }
            }
            CommandResult::Exit(farewell) => {
                writeln!(out, "{farewell}")?;
                break;
            }
            CommandResult::ProcessAsMessage(text) => {
                run_turn(app, text, out, &interrupt).await?;
            }
        }
    }

    info!(entries = app.conversation.transcript().len(), "chat ended");
    Ok(())
}

async fn run_turn<W, I, F>(app: &mut App, text: String, out: &mut W, interrupt: &I) -> io::Result<()>
where
    W: Write,
    I: Fn() -> F,
    F: Future<Output = ()>,
{
    let messages = app.begin_turn(text);
    write!(out, "AI: ")?;
    out.flush()?;

    let result = if app.stream_mode {
        fetch_streaming(&app.client, messages, out, interrupt()).await
    } else {
        fetch_buffered(&app.client, messages, out, interrupt()).await
    };

    match result {
        Ok(reply) => {
            if reply.interrupted {
                writeln!(out, "{INTERRUPTED_NOTICE}")?;
            }
            if reply.interrupted && reply.text.is_empty() {
                app.abandon_turn();
            } else {
                app.complete_turn(reply.text);
            }
        }
        Err(TurnError::Output(err)) => return Err(err),
        Err(TurnError::Chat(err)) => {
            warn!(error = %err, "chat turn failed");
            app.abandon_turn();
            writeln!(out, "[System] Error: {err}")?;
        }
    }

    writeln!(out)
}
