use futures_util::StreamExt;
use memchr::memchr;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{ChatMessage, ChatResponse};
use crate::core::chat_client::{format_api_error, ChatClient};

#[derive(Clone, Debug, PartialEq)]
pub enum StreamMessage {
    Chunk(String),
    Error(String),
    End,
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn handle_data_payload(payload: &str, tx: &mpsc::UnboundedSender<StreamMessage>) -> bool {
    if payload == "[DONE]" {
        let _ = tx.send(StreamMessage::End);
        return true;
    }

    match serde_json::from_str::<ChatResponse>(payload) {
        Ok(response) => {
            if let Some(choice) = response.choices.first() {
                if let Some(content) = &choice.delta.content {
                    let _ = tx.send(StreamMessage::Chunk(content.clone()));
                }
                if let Some(reason) = &choice.finish_reason {
                    debug!(reason = %reason, "stream finished");
                }
            }
            false
        }
        Err(_) => {
            if payload.trim().is_empty() {
                return false;
            }

            let _ = tx.send(StreamMessage::Error(format_api_error(payload)));
            let _ = tx.send(StreamMessage::End);
            true
        }
    }
}

/// Handles one SSE line. Comments (`:`), `event:` lines and blanks are
/// ignored. Returns `true` once the stream is over.
fn process_sse_line(line: &str, tx: &mpsc::UnboundedSender<StreamMessage>) -> bool {
    extract_data_payload(line)
        .map(|payload| handle_data_payload(payload, tx))
        .unwrap_or(false)
}

pub struct StreamParams {
    pub client: ChatClient,
    pub api_messages: Vec<ChatMessage>,
    pub cancel_token: CancellationToken,
}

#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<StreamMessage>,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StreamMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Spawns the streamed request. The receiver sees zero or more `Chunk`s
    /// and at most one `Error`, followed by `End`, unless the token is
    /// cancelled first.
    pub fn spawn_stream(&self, params: StreamParams) {
        let tx_clone = self.tx.clone();
        tokio::spawn(async move {
            let StreamParams {
                client,
                api_messages,
                cancel_token,
            } = params;

            tokio::select! {
                _ = async {
                    match client.request(api_messages, true).send().await {
                        Ok(response) => {
                            if !response.status().is_success() {
                                let status = response.status();
                                let error_text = response
                                    .text()
                                    .await
                                    .unwrap_or_else(|_| "<no body>".to_string());
                                debug!(%status, "stream request rejected");
                                let _ = tx_clone.send(StreamMessage::Error(format_api_error(&error_text)));
                                let _ = tx_clone.send(StreamMessage::End);
                                return;
                            }

                            let mut stream = response.bytes_stream();
                            let mut buffer: Vec<u8> = Vec::new();

                            while let Some(chunk) = stream.next().await {
                                let chunk_bytes = match chunk {
                                    Ok(bytes) => bytes,
                                    Err(err) => {
                                        let _ = tx_clone.send(StreamMessage::Error(format_api_error(&err.to_string())));
                                        let _ = tx_clone.send(StreamMessage::End);
                                        return;
                                    }
                                };
                                buffer.extend_from_slice(&chunk_bytes);

                                while let Some(newline_pos) = memchr(b'\n', &buffer) {
                                    let should_end = match std::str::from_utf8(&buffer[..newline_pos]) {
                                        Ok(line) => process_sse_line(line.trim(), &tx_clone),
                                        Err(err) => {
                                            debug!(error = %err, "skipping invalid UTF-8 line in stream");
                                            false
                                        }
                                    };
                                    buffer.drain(..=newline_pos);
                                    if should_end {
                                        return;
                                    }
                                }
                            }

                            if let Ok(rest) = std::str::from_utf8(&buffer) {
                                if process_sse_line(rest.trim(), &tx_clone) {
                                    return;
                                }
                            }
                            let _ = tx_clone.send(StreamMessage::End);
                        }
                        Err(e) => {
                            let _ = tx_clone.send(StreamMessage::Error(format_api_error(&e.to_string())));
                            let _ = tx_clone.send(StreamMessage::End);
                        }
                    }
                } => {}
                _ = cancel_token.cancelled() => {
                    debug!("stream cancelled");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_client, serve_once};

    async fn collect(mut rx: mpsc::UnboundedReceiver<StreamMessage>) -> Vec<StreamMessage> {
        let mut messages = Vec::new();
        while let Some(message) = rx.recv().await {
            let done = message == StreamMessage::End;
            messages.push(message);
            if done {
                break;
            }
        }
        messages
    }

    #[test]
    fn process_sse_line_handles_spacing_variants() {
        let (service, mut rx) = ChatStreamService::new();

        assert!(!process_sse_line(
            r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#,
            &service.tx
        ));
        assert!(!process_sse_line(
            r#"data:{"choices":[{"delta":{"content":"World"}}]}"#,
            &service.tx
        ));
        assert!(process_sse_line("data:[DONE]", &service.tx));

        assert_eq!(rx.try_recv().unwrap(), StreamMessage::Chunk("Hello".into()));
        assert_eq!(rx.try_recv().unwrap(), StreamMessage::Chunk("World".into()));
        assert_eq!(rx.try_recv().unwrap(), StreamMessage::End);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn process_sse_line_ignores_comments_and_null_deltas() {
        let (service, mut rx) = ChatStreamService::new();

        assert!(!process_sse_line(": OPENROUTER PROCESSING", &service.tx));
        assert!(!process_sse_line("", &service.tx));
        assert!(!process_sse_line(
            r#"data: {"choices":[{"delta":{"role":"assistant","content":null}}]}"#,
            &service.tx
        ));
        assert!(!process_sse_line(
            r#"data: {"choices":[{"delta":{},"finish_reason":"stop"}]}"#,
            &service.tx
        ));
        assert!(!process_sse_line(
            r#"data: {"choices":[{"finish_reason":"stop"}]}"#,
            &service.tx
        ));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn process_sse_line_routes_stream_errors() {
        let (service, mut rx) = ChatStreamService::new();

        assert!(process_sse_line(
            r#"data: {"error":{"message":"internal server error"}}"#,
            &service.tx
        ));

        match rx.try_recv().unwrap() {
            StreamMessage::Error(text) => {
                assert!(text.starts_with("API Error: internal server error\n```json"))
            }
            other => panic!("expected error message, got {other:?}"),
        }
        assert_eq!(rx.try_recv().unwrap(), StreamMessage::End);
    }

    #[tokio::test]
    async fn spawn_stream_forwards_chunks_until_done() {
        let events = concat!(
            ": keep-alive\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Rancak \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"artinya bagus.\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        let (base_url, request) = serve_once("200 OK", "text/event-stream", events).await;
        let (service, rx) = ChatStreamService::new();

        service.spawn_stream(StreamParams {
            client: create_test_client(&base_url),
            api_messages: Vec::new(),
            cancel_token: CancellationToken::new(),
        });

        assert_eq!(
            collect(rx).await,
            vec![
                StreamMessage::Chunk("Rancak ".into()),
                StreamMessage::Chunk("artinya bagus.".into()),
                StreamMessage::End,
            ]
        );
        let captured = request.await.unwrap();
        assert_eq!(captured.body["stream"], true);
    }

    #[tokio::test]
    async fn spawn_stream_reports_http_errors() {
        let (base_url, _request) = serve_once(
            "402 Payment Required",
            "application/json",
            r#"{"error":{"message":"Insufficient credits"}}"#,
        )
        .await;
        let (service, rx) = ChatStreamService::new();

        service.spawn_stream(StreamParams {
            client: create_test_client(&base_url),
            api_messages: Vec::new(),
            cancel_token: CancellationToken::new(),
        });

        let messages = collect(rx).await;
        assert_eq!(messages.len(), 2);
        assert!(
            matches!(&messages[0], StreamMessage::Error(text) if text.starts_with("API Error: Insufficient credits"))
        );
        assert_eq!(messages[1], StreamMessage::End);
    }

    #[tokio::test]
    async fn cancelled_stream_sends_nothing() {
        let (service, mut rx) = ChatStreamService::new();
        let cancel_token = CancellationToken::new();
        cancel_token.cancel();

        service.spawn_stream(StreamParams {
            client: create_test_client("http://127.0.0.1:9"),
            api_messages: Vec::new(),
            cancel_token,
        });
        drop(service);

        assert!(rx.recv().await.is_none());
    }
}
