use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const PROVIDERS_JSON: &str = include_str!("providers.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRegistry {
    pub default_provider: String,
    pub providers: Vec<ProviderDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDef {
    pub id: String,
    pub name: String,
    pub base_url: String,
    /// Environment variable holding the bearer key.
    pub env_key: String,
    pub default_model: String,
    /// Honours `response_format: {"type": "json_object"}`.
    #[serde(default)]
    pub json_mode: bool,
    /// Accepts `modalities: ["image", "text"]`.
    #[serde(default)]
    pub image_output: bool,
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
}

impl ProviderRegistry {
    pub fn load() -> Self {
        serde_json::from_str(PROVIDERS_JSON).expect("providers.json is invalid")
    }

    pub fn get_provider(&self, id: &str) -> Option<&ProviderDef> {
        let normalized = id.to_lowercase();
        self.providers
            .iter()
            .find(|p| p.id == normalized || p.name.to_lowercase() == normalized)
    }

    #[cfg(test)]
    pub fn default_provider(&self) -> Option<&ProviderDef> {
        self.get_provider(&self.default_provider)
    }

    /// Points a provider at a different endpoint (local proxies, mocks).
    pub fn override_base_url(&mut self, id: &str, base_url: &str) {
        if let Some(p) = self.providers.iter_mut().find(|p| p.id == id) {
            p.base_url = base_url.to_string();
        }
    }
}
