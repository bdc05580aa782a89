use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::registry::{ProviderDef, ProviderRegistry};
use super::{ChatGateway, ChatMessage, ChatRequest, GatewayError, GeneratedImage, check_status};
use crate::core::catalog;
use crate::core::config::Secrets;

/// Chat-completions client that routes each model to its registered provider.
pub struct GatewayClient {
    client: Client,
    registry: ProviderRegistry,
    keys: HashMap<String, String>,
}

impl GatewayClient {
    pub fn new(
        registry: ProviderRegistry,
        secrets: &Secrets,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let keys = registry
            .providers
            .iter()
            .filter_map(|p| secrets.provider_key(&p.env_key).map(|k| (p.id.clone(), k)))
            .collect();
        Ok(Self::with_client(client, registry, keys))
    }

    pub fn with_client(
        client: Client,
        registry: ProviderRegistry,
        keys: HashMap<String, String>,
    ) -> Self {
        Self {
            client,
            registry,
            keys,
        }
    }

    fn route(&self, model: &str) -> Result<(&ProviderDef, &str), GatewayError> {
        let provider_id = catalog::find_model(model)
            .filter(|m| m.provider.is_chat())
            .map(|m| m.provider.as_str())
            .unwrap_or(self.registry.default_provider.as_str());

        let provider = self
            .registry
            .get_provider(provider_id)
            .ok_or_else(|| GatewayError::MissingCredential(format!("provider '{}'", provider_id)))?;
        let key = self
            .keys
            .get(&provider.id)
            .ok_or_else(|| GatewayError::MissingCredential(provider.env_key.clone()))?;
        Ok((provider, key.as_str()))
    }

    fn post(&self, provider: &ProviderDef, key: &str, body: &Value) -> RequestBuilder {
        let mut request = self
            .client
            .post(&provider.base_url)
            .header("Authorization", format!("Bearer {}", key))
            .json(body);
        for (name, value) in &provider.extra_headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }

    async fn send(
        &self,
        provider: &ProviderDef,
        key: &str,
        body: &Value,
    ) -> Result<Value, GatewayError> {
        let res = self
            .post(provider, key, body)
            .send()
            .await
            .map_err(|e| GatewayError::transport(&provider.name, e))?;
        let res = check_status(&provider.name, res).await.inspect_err(|e| {
            warn!("{} rejected request: {}", provider.name, e);
        })?;
        let text = res
            .text()
            .await
            .map_err(|e| GatewayError::transport(&provider.name, e))?;
        serde_json::from_str(&text).map_err(|_| GatewayError::MissingContent(provider.name.clone()))
    }
}

/// Assistant text at `choices[0].message.content`, either a string or a list
/// of text parts.
pub(crate) fn message_content(body: &Value) -> Option<String> {
    let content = body.pointer("/choices/0/message/content")?;
    let text = match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl ChatGateway for GatewayClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let (provider, key) = self.route(&request.model)?;

        let mut body = json!({
            "model": request.model,
            "messages": request.messages,
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        if request.json_output && provider.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        debug!(
            "Calling {} with model {} ({} messages)",
            provider.name,
            request.model,
            request.messages.len()
        );
        let parsed = self.send(provider, key, &body).await?;
        message_content(&parsed).ok_or_else(|| GatewayError::MissingContent(provider.name.clone()))
    }

    async fn generate_image(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<GeneratedImage, GatewayError> {
        let (provider, key) = self.route(model)?;
        if !provider.image_output {
            return Err(GatewayError::Failed {
                provider: provider.name.clone(),
                message: format!("model {} cannot produce images", model),
            });
        }

        let body = json!({
            "model": model,
            "messages": messages,
            "modalities": ["image", "text"],
        });
        debug!("Requesting image from {} with model {}", provider.name, model);
        let parsed = self.send(provider, key, &body).await?;

        let url = parsed
            .pointer("/choices/0/message/images/0/image_url/url")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| GatewayError::MissingContent(provider.name.clone()))?;
        Ok(GeneratedImage {
            url: url.to_string(),
            text: message_content(&parsed),
        })
    }
}
