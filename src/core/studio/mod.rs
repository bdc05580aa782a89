//! Orchestration for each studio endpoint.
//!
//! A [`Studio`] holds the upstream clients behind trait objects and exposes one
//! async method per endpoint. Methods validate the request, build prompts, call
//! upstream and coerce the reply; they know nothing about HTTP.

pub mod advisor;
pub mod generate;
pub mod image;
pub mod photo;
pub mod product;
pub mod reel;
pub mod ugc;

#[cfg(test)]
pub(crate) mod testing;

use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use crate::core::coerce::{CoerceError, parse_model_json};
use crate::core::config::{AppConfig, Secrets};
use crate::core::llm::registry::ProviderRegistry;
use crate::core::llm::{ChatGateway, ChatMessage, ChatRequest, GatewayClient, GatewayError};
use crate::core::media::{ImageGenerator, ReplicateClient, RunwareClient, VideoGenerator};

#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Parse(#[from] CoerceError),
    #[error("No assets were generated")]
    NothingGenerated,
}

impl StudioError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[derive(Debug, Clone)]
pub struct StudioSettings {
    pub temperature: f32,
    pub max_variations: usize,
    pub concurrency: usize,
    pub reel_model: String,
    pub ugc_image_model: String,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl StudioSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            temperature: config.gateway.temperature,
            max_variations: config.generation.max_variations.max(1),
            concurrency: config.generation.concurrency.max(1),
            reel_model: config.generation.reel_model.clone(),
            ugc_image_model: config.generation.ugc_image_model.clone(),
        }
    }

    /// Requested asset count, defaulted and capped at `max_variations`.
    pub fn variation_count(&self, requested: Option<usize>, default: usize) -> usize {
        requested
            .unwrap_or(default)
            .clamp(1, self.max_variations.max(1))
    }
}

pub struct Studio {
    gateway: Arc<dyn ChatGateway>,
    reels: Arc<dyn VideoGenerator>,
    ugc_images: Arc<dyn ImageGenerator>,
    ugc_videos: Arc<dyn VideoGenerator>,
    settings: StudioSettings,
}

impl Studio {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        reels: Arc<dyn VideoGenerator>,
        ugc_images: Arc<dyn ImageGenerator>,
        ugc_videos: Arc<dyn VideoGenerator>,
        settings: StudioSettings,
    ) -> Self {
        Self {
            gateway,
            reels,
            ugc_images,
            ugc_videos,
            settings,
        }
    }

    /// Wires the real upstream clients from config and environment secrets.
    pub fn connect(config: &AppConfig, secrets: &Secrets) -> Result<Self, reqwest::Error> {
        let mut registry = ProviderRegistry::load();
        if let Some(url) = &config.upstream.gateway_url {
            registry.override_base_url("lovable", url);
        }
        if let Some(url) = &config.upstream.openrouter_url {
            registry.override_base_url("openrouter", url);
        }
        let gateway = GatewayClient::new(registry, secrets, config.request_timeout())?;

        let client = Client::builder().timeout(config.request_timeout()).build()?;
        let replicate = ReplicateClient::new(
            client.clone(),
            secrets.replicate_api_token.clone(),
            config.upstream.replicate_url.as_str(),
            config.poll_policy(),
        );
        let runware = Arc::new(RunwareClient::new(
            client,
            secrets.runware_api_key.clone(),
            config.upstream.runware_url.as_str(),
            config.poll_policy(),
        ));

        Ok(Self::new(
            Arc::new(gateway),
            Arc::new(replicate),
            runware.clone(),
            runware,
            StudioSettings::from_config(config),
        ))
    }

    pub fn settings(&self) -> &StudioSettings {
        &self.settings
    }

    /// Chat completion in JSON mode, coerced into a JSON value.
    async fn complete_json(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<Value, StudioError> {
        let text = self.complete_text(model, messages).await?;
        parse_model_json(&text)
            .inspect_err(|e| warn!("Unparseable reply from {}: {}", model, e.excerpt))
            .map_err(StudioError::from)
    }

    async fn complete_text(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, StudioError> {
        let request = ChatRequest::new(model, messages)
            .temperature(self.settings.temperature)
            .json();
        Ok(self.gateway.complete(&request).await?)
    }

    /// Runs `count` generations through a bounded, order-preserving stream.
    /// Failed items are logged and dropped; if none succeed the first error
    /// is returned.
    async fn generate_all<T, F, Fut>(&self, count: usize, make: F) -> Result<Vec<T>, StudioError>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T, StudioError>>,
    {
        let results: Vec<Result<T, StudioError>> = stream::iter(0..count)
            .map(make)
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let mut items = Vec::with_capacity(count);
        let mut first_error = None;
        for (idx, result) in results.into_iter().enumerate() {
            match result {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!("Asset {} of {} failed: {}", idx + 1, count, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        if items.is_empty() {
            return Err(first_error.unwrap_or(StudioError::NothingGenerated));
        }
        Ok(items)
    }
}

/// Trimmed value of a required text field.
pub(crate) fn required<'a>(value: &'a str, name: &str) -> Result<&'a str, StudioError> {
    let value = value.trim();
    if value.is_empty() {
        Err(StudioError::validation(format!("{} is required", name)))
    } else {
        Ok(value)
    }
}

/// `None` for absent or blank optional fields.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
