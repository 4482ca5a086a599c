//! Chat-completion client shared by the buffered and streaming fetch paths.

use thiserror::Error;
use tracing::debug;

use crate::api::{ChatCompletion, ChatMessage, ChatRequest};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Already formatted with [`format_api_error`].
    #[error("{0}")]
    Api(String),

    #[error("API response contained no choices")]
    NoChoices,
}

/// Connection settings for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Clone, Debug)]
pub struct ChatClient {
    pub http: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    /// OpenRouter attribution, sent as `HTTP-Referer` when set.
    pub referer: Option<String>,
    /// OpenRouter attribution, sent as `X-Title` when set.
    pub app_title: Option<String>,
}

impl ChatClient {
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    pub(crate) fn request(
        &self,
        messages: Vec<ChatMessage>,
        stream: bool,
    ) -> reqwest::RequestBuilder {
        let body = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            stream,
        };
        let mut request = self
            .http
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key));
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.app_title {
            request = request.header("X-Title", title);
        }
        debug!(url = %self.endpoint(), model = %self.model, stream, "sending chat request");
        request.json(&body)
    }

    /// Fetches the whole reply in one response (`stream: false`).
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ChatError> {
        let response = self.request(messages, false).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            debug!(%status, "chat request rejected");
            return Err(ChatError::Api(format_api_error(&error_text)));
        }

        let body = response.text().await?;
        let completion: ChatCompletion =
            serde_json::from_str(&body).map_err(|_| ChatError::Api(format_api_error(&body)))?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(ChatError::NoChoices)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

pub(crate) fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error:\n```\n<empty>\n```".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            return match extract_error_summary(&json_value) {
                Some(summary) if !summary.is_empty() => {
                    format!("API Error: {summary}\n```json\n{pretty_json}\n```")
                }
                _ => format!("API Error:\n```json\n{pretty_json}\n```"),
            };
        }
    }

    format!("API Error:\n```\n{trimmed}\n```")
}
