pub mod gateway;
pub mod registry;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};

pub use gateway::GatewayClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user turn with an attached image (URL or data URI).
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    /// Ask for a JSON object response where the provider supports it.
    pub json_output: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            json_output: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub url: String,
    pub text: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Rate limit exceeded, please try again later.")]
    RateLimited,
    #[error("Payment required, please add credits to your workspace.")]
    PaymentRequired,
    #[error("{provider} error (HTTP {status}): {body}")]
    Upstream {
        provider: String,
        status: u16,
        body: String,
    },
    #[error("{0} returned no usable content")]
    MissingContent(String),
    #[error("{provider} generation failed: {message}")]
    Failed { provider: String, message: String },
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} did not finish after {attempts} polls")]
    Timeout { provider: String, attempts: u32 },
    #[error("{0} is not configured")]
    MissingCredential(String),
}

impl GatewayError {
    pub fn transport(provider: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            provider: provider.to_string(),
            source,
        }
    }
}

/// Maps non-2xx responses to [`GatewayError`]. 429 and 402 are classified
/// without reading the body.
pub async fn check_status(provider: &str, res: Response) -> Result<Response, GatewayError> {
    match res.status() {
        StatusCode::TOO_MANY_REQUESTS => Err(GatewayError::RateLimited),
        StatusCode::PAYMENT_REQUIRED => Err(GatewayError::PaymentRequired),
        status if !status.is_success() => {
            let body = res.text().await.unwrap_or_default();
            Err(GatewayError::Upstream {
                provider: provider.to_string(),
                status: status.as_u16(),
                body: truncate(&body, 500),
            })
        }
        _ => Ok(res),
    }
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Runs a chat completion and returns the assistant text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError>;

    /// Runs an image-output completion and returns the first generated image.
    async fn generate_image(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<GeneratedImage, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_message_serializes_as_plain_string() {
        let msg = ChatMessage::user("hello");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "role": "user", "content": "hello" })
        );
    }

    #[test]
    fn image_message_serializes_as_content_parts() {
        let msg = ChatMessage::user_with_image("describe", "https://cdn.example/p.png");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": "describe" },
                    { "type": "image_url", "image_url": { "url": "https://cdn.example/p.png" } }
                ]
            })
        );
    }

    #[test]
    fn upstream_error_message_carries_status() {
        let err = GatewayError::Upstream {
            provider: "Lovable AI Gateway".to_string(),
            status: 503,
            body: "overloaded".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("مرحبا بكم", 3), "مرح…");
    }
}
