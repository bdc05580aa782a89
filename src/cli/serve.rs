use anyhow::{Context, Result};
use console::style;
use reqwest::Client;
use std::sync::Arc;
use tracing::warn;

use super::{ServeArgs, load_config};
use crate::core::backend::{
    AuthVerifier, NoopUsage, SupabaseAuth, SupabaseUsage, Unconfigured, UsageRecorder,
};
use crate::core::config::{AppConfig, Secrets};
use crate::core::studio::Studio;
use crate::core::terminal::GuideSection;
use crate::interfaces::web::{ApiServer, ApiServerConfig};

/// Auth is skipped entirely when the config says so. When it is required but
/// the backend keys are missing, every protected request gets a 401.
pub(crate) fn build_auth(
    config: &AppConfig,
    client: Client,
    secrets: &Secrets,
) -> Option<Arc<dyn AuthVerifier>> {
    if !config.auth.required {
        warn!("Bearer auth is disabled ([auth] required = false)");
        return None;
    }
    match SupabaseAuth::from_secrets(client, secrets) {
        Some(auth) => Some(Arc::new(auth)),
        None => {
            warn!("SUPABASE_URL or SUPABASE_ANON_KEY is not set; protected routes will answer 401");
            Some(Arc::new(Unconfigured))
        }
    }
}

pub(crate) fn build_usage(client: Client, secrets: &Secrets) -> Arc<dyn UsageRecorder> {
    match SupabaseUsage::from_secrets(client, secrets) {
        Some(usage) => Arc::new(usage),
        None => Arc::new(NoopUsage),
    }
}

pub(super) async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = load_config(&args.common).await?;
    let secrets = Secrets::from_env();

    let studio = Studio::connect(&config, &secrets).context("building upstream clients")?;
    let client = Client::builder()
        .timeout(config.request_timeout())
        .build()
        .context("building backend client")?;
    let auth = build_auth(&config, client.clone(), &secrets);
    let usage = build_usage(client, &secrets);

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    GuideSection::new("adsmith API")
        .status(
            "Endpoint",
            &format!("{}", style(format!("http://{}:{}/api", host, port)).underlined().cyan()),
        )
        .status("Auth", if auth.is_some() { "bearer (Supabase)" } else { "off" })
        .status(
            "Polling",
            &format!(
                "{}ms x {}",
                config.polling.interval_ms, config.polling.max_attempts
            ),
        )
        .blank()
        .info("Press Ctrl+C to stop.")
        .print();
    println!();

    ApiServer::new(ApiServerConfig {
        studio,
        auth,
        usage,
        host,
        port,
    })
    .serve()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::AuthError;

    fn secrets(pairs: &[(&str, &str)]) -> Secrets {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Secrets::from_lookup(move |key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn auth_can_be_disabled() {
        let mut config = AppConfig::default();
        config.auth.required = false;
        assert!(build_auth(&config, Client::new(), &Secrets::default()).is_none());
    }

    #[tokio::test]
    async fn required_auth_without_backend_refuses_requests() {
        let auth = build_auth(&AppConfig::default(), Client::new(), &Secrets::default())
            .expect("auth stays on");
        assert!(matches!(
            auth.verify("token").await,
            Err(AuthError::NotConfigured)
        ));
    }

    #[test]
    fn required_auth_with_backend_is_enabled() {
        let secrets = secrets(&[
            ("SUPABASE_URL", "https://proj.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]);
        assert!(build_auth(&AppConfig::default(), Client::new(), &secrets).is_some());
    }
}
