pub(crate) mod auth;
mod error;
mod handlers;
mod router;

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tracing::info;

use crate::core::backend::{AuthVerifier, UsageRecorder};
use crate::core::studio::Studio;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) studio: Arc<Studio>,
    /// `None` disables bearer auth.
    pub(crate) auth: Option<Arc<dyn AuthVerifier>>,
    pub(crate) usage: Arc<dyn UsageRecorder>,
}

pub struct ApiServer {
    state: AppState,
    host: String,
    port: u16,
}

pub struct ApiServerConfig {
    pub studio: Studio,
    pub auth: Option<Arc<dyn AuthVerifier>>,
    pub usage: Arc<dyn UsageRecorder>,
    pub host: String,
    pub port: u16,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig) -> Self {
        Self {
            state: AppState {
                studio: Arc::new(config.studio),
                auth: config.auth,
                usage: config.usage,
            },
            host: config.host,
            port: config.port,
        }
    }

    pub fn router(&self) -> Router {
        router::build_api_router(self.state.clone())
    }

    /// Serves until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {}", addr))?;
        info!(
            "API server running at http://{} (auth {})",
            listener.local_addr()?,
            if self.state.auth.is_some() { "on" } else { "off" }
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("API server crashed")?;
        info!("API server stopped.");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested, draining connections...");
    }
}
