//! Chat completion request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role attached to the prompt message
pub const USER_ROLE: &str = "user";

/// Role reported when the response omits one
pub const DEFAULT_ROLE: &str = "assistant";

/// Chat completion request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Create a request carrying exactly one user message
    pub fn single_prompt(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: USER_ROLE.to_string(),
                content: prompt.to_string(),
            }],
        }
    }
}

/// Message in a chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat completion response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
}

impl ResponseMessage {
    /// Text content, joining text parts when the content is an array
    pub fn text(&self) -> Option<String> {
        match self.content.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Array(parts) => {
                let joined: String = parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect();
                Some(joined)
            }
            _ => None,
        }
    }
}

impl ChatResponse {
    /// The first choice's message, if any
    pub fn first_message(&self) -> Option<&ResponseMessage> {
        self.choices.first().and_then(|c| c.message.as_ref())
    }
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
}

impl ApiErrorDetail {
    /// Machine-readable code, falling back to the error type
    pub fn code(&self) -> Option<String> {
        match &self.code {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => self.error_type.clone(),
        }
    }
}

/// Successful completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub content: String,
    pub role: String,
    pub usage: Option<Value>,
    pub elapsed_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_prompt_body() {
        let request = ChatRequest::single_prompt("m1", "hello");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"model": "m1", "messages": [{"role": "user", "content": "hello"}]})
        );
    }

    #[test]
    fn test_response_text_variants() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "hi"}}],
            "usage": {"tokens": 3}
        }))
        .unwrap();
        assert_eq!(response.first_message().unwrap().text().as_deref(), Some("hi"));
        assert_eq!(response.usage, Some(json!({"tokens": 3})));

        let parts: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": [
                {"type": "text", "text": "Bon"},
                {"type": "text", "text": "jour"}
            ]}}]
        }))
        .unwrap();
        assert_eq!(parts.first_message().unwrap().text().as_deref(), Some("Bonjour"));

        let null_content: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(null_content.first_message().unwrap().text(), None);

        let empty: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.first_message().is_none());
    }

    #[test]
    fn test_error_code_fallback() {
        let err: ApiErrorResponse = serde_json::from_value(json!({
            "error": {"message": "Rate limit reached", "type": "requests", "code": "rate_limit_exceeded"}
        }))
        .unwrap();
        assert_eq!(err.error.code().as_deref(), Some("rate_limit_exceeded"));

        let err: ApiErrorResponse = serde_json::from_value(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "code": null}
        }))
        .unwrap();
        assert_eq!(err.error.code().as_deref(), Some("invalid_request_error"));
    }
}
