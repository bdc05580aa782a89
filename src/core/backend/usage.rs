use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::config::Secrets;

/// One row of the `usage_logs` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    pub user_id: String,
    pub tool_type: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl UsageRecord {
    pub fn new(user_id: &str, tool_type: &str, model: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            tool_type: tool_type.to_string(),
            model: model.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait UsageRecorder: Send + Sync {
    async fn record(&self, record: &UsageRecord) -> Result<()>;
}

/// Records usage and logs failures instead of returning them.
pub async fn record_best_effort(recorder: &dyn UsageRecorder, record: UsageRecord) {
    if let Err(e) = recorder.record(&record).await {
        warn!(
            "Failed to record usage of {} for {}: {:#}",
            record.tool_type, record.user_id, e
        );
    }
}

/// Inserts rows through the PostgREST endpoint with the service-role key.
pub struct SupabaseUsage {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseUsage {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    pub fn from_secrets(client: Client, secrets: &Secrets) -> Option<Self> {
        let url = secrets.supabase_url.as_deref()?;
        let key = secrets.supabase_service_role_key.as_deref()?;
        Some(Self::new(client, url, key))
    }
}

#[async_trait]
impl UsageRecorder for SupabaseUsage {
    async fn record(&self, record: &UsageRecord) -> Result<()> {
        let res = self
            .client
            .post(format!("{}/rest/v1/usage_logs", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            bail!("usage_logs insert failed (HTTP {}): {}", status.as_u16(), body);
        }
        debug!("Recorded {} usage for {}", record.tool_type, record.user_id);
        Ok(())
    }
}

/// Used when no backend is configured.
pub struct NoopUsage;

#[async_trait]
impl UsageRecorder for NoopUsage {
    async fn record(&self, _record: &UsageRecord) -> Result<()> {
        Ok(())
    }
}
