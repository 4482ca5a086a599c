//! Fetches one assistant reply and echoes it to the terminal.

use std::future::Future;
use std::io::{self, Write};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::ChatMessage;
use crate::core::chat_client::{ChatClient, ChatError};
use crate::core::chat_stream::{ChatStreamService, StreamMessage, StreamParams};

#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("cannot write reply: {0}")]
    Output(#[from] io::Error),
}

/// Text received for one turn.
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    pub text: String,
    /// Set when the user stopped the stream; `text` holds what arrived so far.
    pub interrupted: bool,
}

/// Waits for the full reply, then prints it on one line.
///
/// If `interrupt` resolves first the request is dropped and the reply is
/// empty.
pub async fn fetch_buffered<W, F>(
    client: &ChatClient,
    messages: Vec<ChatMessage>,
    out: &mut W,
    interrupt: F,
) -> Result<Reply, TurnError>
where
    W: Write,
    F: Future<Output = ()>,
{
    let result = tokio::select! {
        result = client.complete(messages) => result,
        _ = interrupt => {
            debug!("buffered request interrupted by user");
            writeln!(out)?;
            out.flush()?;
            return Ok(Reply {
                text: String::new(),
                interrupted: true,
            });
        }
    };
    let text = match result {
        Ok(text) => text,
        Err(err) => {
            writeln!(out)?;
            return Err(err.into());
        }
    };
    writeln!(out, "{text}")?;
    out.flush()?;
    Ok(Reply {
        text,
        interrupted: false,
    })
}

/// Prints chunks as they arrive and ends the line when the stream finishes.
///
/// If `interrupt` resolves first the request is cancelled and the partial
/// text is returned.
pub async fn fetch_streaming<W, F>(
    client: &ChatClient,
    messages: Vec<ChatMessage>,
    out: &mut W,
    interrupt: F,
) -> Result<Reply, TurnError>
where
    W: Write,
    F: Future<Output = ()>,
{
    let (service, mut rx) = ChatStreamService::new();
    let cancel_token = CancellationToken::new();
    service.spawn_stream(StreamParams {
        client: client.clone(),
        api_messages: messages,
        cancel_token: cancel_token.clone(),
    });
    // The spawned task holds the only sender from here on.
    drop(service);

    tokio::pin!(interrupt);
    let mut reply = Reply::default();

    loop {
        tokio::select! {
            message = rx.recv() => match message {
                Some(StreamMessage::Chunk(chunk)) => {
                    write!(out, "{chunk}")?;
                    out.flush()?;
                    reply.text.push_str(&chunk);
                }
                Some(StreamMessage::Error(err)) => {
                    writeln!(out)?;
                    return Err(ChatError::Api(err).into());
                }
                Some(StreamMessage::End) | None => break,
            },
            _ = &mut interrupt => {
                cancel_token.cancel();
                debug!(received = reply.text.len(), "stream interrupted by user");
                reply.interrupted = true;
                break;
            }
        }
    }

    writeln!(out)?;
    out.flush()?;
    Ok(reply)
}

/// Resolves on Ctrl+C. If the handler cannot be installed it never resolves.
pub async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
