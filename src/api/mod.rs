use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub stream: bool,
}

#[derive(Deserialize, Default)]
pub struct ChatResponseDelta {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    /// Some providers omit it on the final `finish_reason` frame.
    #[serde(default)]
    pub delta: ChatResponseDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// One `data:` event of a streamed completion.
#[derive(Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatResponseChoice>,
}

#[derive(Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

/// Body of a non-streamed (`stream: false`) completion.
#[derive(Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<ChatCompletionChoice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_openai_shape() {
        let request = ChatRequest {
            model: "openrouter/free".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Apa arti awak?".to_string(),
            }],
            temperature: 0.7,
            stream: true,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "openrouter/free");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Apa arti awak?");
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["stream"], true);
    }

    #[test]
    fn completion_tolerates_null_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":null}}]}"#;
        let completion: ChatCompletion = serde_json::from_str(body).unwrap();
        assert!(completion.choices[0].message.content.is_none());
    }
}
