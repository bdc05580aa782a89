use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::core::media::PollPolicy;

pub const CONFIG_ENV: &str = "ADSMITH_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "adsmith.toml";

/// Non-secret service settings. Every section falls back to its defaults, so an
/// empty or missing file is a valid configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub upstream: UpstreamConfig,
    pub polling: PollingConfig,
    pub generation: GenerationConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub request_timeout_secs: u64,
    pub temperature: f32,
}

/// Base URL overrides for the hosted providers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Replaces the chat-completions URL of the `lovable` provider.
    pub gateway_url: Option<String>,
    /// Replaces the chat-completions URL of the `openrouter` provider.
    pub openrouter_url: Option<String>,
    pub replicate_url: String,
    pub runware_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_variations: usize,
    pub concurrency: usize,
    pub reel_model: String,
    pub ugc_image_model: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub required: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
            temperature: 0.7,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            gateway_url: None,
            openrouter_url: None,
            replicate_url: "https://api.replicate.com".to_string(),
            runware_url: "https://api.runware.ai/v1".to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_attempts: 60,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_variations: 4,
            concurrency: 1,
            reel_model: "wavespeedai/wan-2.1-i2v-480p".to_string(),
            ugc_image_model: "runware:101@1".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { required: true }
    }
}

impl AppConfig {
    /// Reads the TOML file at `path`, or returns defaults when it does not exist.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {}, using defaults.", path.display());
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        info!(
            "Loaded config from {}: {}:{}, poll={}ms x{}",
            path.display(),
            config.server.host,
            config.server.port,
            config.polling.interval_ms,
            config.polling.max_attempts
        );
        Ok(config)
    }

    /// Explicit path, then `ADSMITH_CONFIG`, then `./adsmith.toml`.
    pub fn resolve_path(explicit: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        explicit
            .map(PathBuf::from)
            .or_else(|| lookup(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.polling.interval_ms),
            max_attempts: self.polling.max_attempts.max(1),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.request_timeout_secs.max(1))
    }
}

/// Provider keys and backend credentials. Only ever read from the environment.
#[derive(Clone, Default)]
pub struct Secrets {
    pub lovable_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub replicate_api_token: Option<String>,
    pub runware_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub supabase_service_role_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            lovable_api_key: get("LOVABLE_API_KEY"),
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            replicate_api_token: get("REPLICATE_API_TOKEN"),
            runware_api_key: get("RUNWARE_API_KEY"),
            supabase_url: get("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string()),
            supabase_anon_key: get("SUPABASE_ANON_KEY"),
            supabase_service_role_key: get("SUPABASE_SERVICE_ROLE_KEY"),
        }
    }

    /// Key for a chat provider, looked up by the env var name the registry declares.
    pub fn provider_key(&self, env_key: &str) -> Option<String> {
        match env_key {
            "LOVABLE_API_KEY" => self.lovable_api_key.clone(),
            "OPENROUTER_API_KEY" => self.openrouter_api_key.clone(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = |v: &Option<String>| if v.is_some() { "set" } else { "unset" };
        f.debug_struct("Secrets")
            .field("lovable_api_key", &set(&self.lovable_api_key))
            .field("openrouter_api_key", &set(&self.openrouter_api_key))
            .field("replicate_api_token", &set(&self.replicate_api_token))
            .field("runware_api_key", &set(&self.runware_api_key))
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &set(&self.supabase_anon_key))
            .field(
                "supabase_service_role_key",
                &set(&self.supabase_service_role_key),
            )
            .finish()
    }
}
