use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::core::app::{App, Settings};
use crate::core::chat_client::ChatClient;
use crate::core::conversation::Conversation;
use crate::core::knowledge::KnowledgeBase;
use crate::core::prompt::build_system_prompt;
use crate::utils::logging::LoggingState;

pub fn create_test_client(base_url: &str) -> ChatClient {
    ChatClient {
        http: reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client should build"),
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
        temperature: 0.7,
        referer: None,
        app_title: None,
    }
}

pub fn create_test_settings(dir: &Path) -> Settings {
    Settings {
        model: "test-model".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        temperature: 0.7,
        stream: true,
        assistant_name: "Kura".to_string(),
        knowledge_file: dir.join("minangkabau_knowledge.json"),
        history_file: dir.join("chat_history.json"),
        referer: None,
        app_title: None,
    }
}

/// App rooted in `dir`, talking to `base_url`.
pub fn create_test_app(dir: &Path, base_url: &str) -> App {
    let settings = create_test_settings(dir);
    let knowledge = KnowledgeBase::load(&settings.knowledge_file).expect("knowledge should load");
    let prompt = build_system_prompt(&settings.assistant_name, &knowledge)
        .expect("prompt should render");

    App {
        stream_mode: settings.stream,
        client: create_test_client(base_url),
        conversation: Conversation::new(prompt),
        knowledge,
        logging: LoggingState::new(None),
        settings,
    }
}

pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Accepts one HTTP request on a random local port and answers it with the
/// given status line, content type and body.
pub async fn serve_once(
    status: &str,
    content_type: &str,
    body: &str,
) -> (String, JoinHandle<CapturedRequest>) {
    let (listener, base_url) = bind().await;
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("connection should arrive");
        let request = read_request(&mut stream).await;

        stream
            .write_all(response.as_bytes())
            .await
            .expect("response should write");
        stream.shutdown().await.ok();
        request
    });

    (base_url, handle)
}

/// Accepts one request, notifies `received`, writes `prefix` verbatim and
/// then holds the connection open without ever finishing the response.
pub async fn serve_stalled(prefix: &str, received: Arc<Notify>) -> String {
    let (listener, base_url) = bind().await;
    let prefix = prefix.to_string();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("connection should arrive");
        read_request(&mut stream).await;
        received.notify_one();

        if !prefix.is_empty() {
            stream
                .write_all(prefix.as_bytes())
                .await
                .expect("prefix should write");
            stream.flush().await.ok();
        }
        std::future::pending::<()>().await;
    });

    base_url
}

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    (listener, format!("http://{addr}"))
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buffer = Vec::new();
    let header_end = loop {
        let mut chunk = [0_u8; 1024];
        let read = stream.read(&mut chunk).await.expect("request should read");
        assert!(read > 0, "connection closed before headers");
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream.read(&mut chunk).await.expect("body should read");
        assert!(read > 0, "connection closed before body");
        body.extend_from_slice(&chunk[..read]);
    }

    CapturedRequest {
        request_line,
        headers,
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    }
}
