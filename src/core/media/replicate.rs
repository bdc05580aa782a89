use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::{PollPolicy, PollStatus, VideoGenerator, VideoRequest, poll_until};
use crate::core::llm::{GatewayError, check_status};

const PROVIDER: &str = "Replicate";

#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub output: Value,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionUrls {
    pub get: Option<String>,
}

/// First URL in a prediction output, which is either a string or a list.
pub fn output_url(output: &Value) -> Option<String> {
    match output {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str()).map(str::to_string),
        _ => None,
    }
}

fn classify(prediction: &Prediction) -> PollStatus<String> {
    match prediction.status.as_str() {
        "succeeded" => match output_url(&prediction.output) {
            Some(url) => PollStatus::Done(url),
            None => PollStatus::Failed("prediction succeeded without output".to_string()),
        },
        "failed" | "canceled" => PollStatus::Failed(
            prediction
                .error
                .as_ref()
                .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                .unwrap_or_else(|| format!("prediction {}", prediction.status)),
        ),
        _ => PollStatus::Pending,
    }
}

pub struct ReplicateClient {
    client: Client,
    api_token: Option<String>,
    base_url: String,
    policy: PollPolicy,
}

impl ReplicateClient {
    pub fn new(
        client: Client,
        api_token: Option<String>,
        base_url: impl Into<String>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            client,
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
        }
    }

    fn token(&self) -> Result<&str, GatewayError> {
        self.api_token
            .as_deref()
            .ok_or_else(|| GatewayError::MissingCredential("REPLICATE_API_TOKEN".to_string()))
    }

    async fn read_prediction(&self, res: reqwest::Response) -> Result<Prediction, GatewayError> {
        let res = check_status(PROVIDER, res).await?;
        res.json::<Prediction>()
            .await
            .map_err(|_| GatewayError::MissingContent(PROVIDER.to_string()))
    }

    /// `model` is `owner/name`; the latest version is used.
    pub async fn create_prediction(
        &self,
        model: &str,
        input: &Value,
    ) -> Result<Prediction, GatewayError> {
        let token = self.token()?;
        let res = self
            .client
            .post(format!("{}/v1/models/{}/predictions", self.base_url, model))
            .bearer_auth(token)
            .json(&json!({ "input": input }))
            .send()
            .await
            .map_err(|e| GatewayError::transport(PROVIDER, e))?;
        self.read_prediction(res).await
    }

    pub async fn get_prediction(&self, url: &str) -> Result<Prediction, GatewayError> {
        let token = self.token()?;
        let res = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| GatewayError::transport(PROVIDER, e))?;
        self.read_prediction(res).await
    }

    /// Submits a prediction and polls it to completion, returning the output URL.
    pub async fn run(&self, model: &str, input: &Value) -> Result<String, GatewayError> {
        let created = self.create_prediction(model, input).await?;
        info!(
            "Replicate prediction {} created for {} ({})",
            created.id, model, created.status
        );

        match classify(&created) {
            PollStatus::Done(url) => return Ok(url),
            PollStatus::Failed(message) => {
                return Err(GatewayError::Failed {
                    provider: PROVIDER.to_string(),
                    message,
                });
            }
            PollStatus::Pending => {}
        }

        let status_url = created
            .urls
            .and_then(|u| u.get)
            .unwrap_or_else(|| format!("{}/v1/predictions/{}", self.base_url, created.id));
        let status_url = status_url.as_str();

        poll_until(PROVIDER, self.policy, move |_| async move {
            self.get_prediction(status_url).await.map(|p| classify(&p))
        })
        .await
    }
}

#[async_trait]
impl VideoGenerator for ReplicateClient {
    async fn image_to_video(&self, request: &VideoRequest) -> Result<String, GatewayError> {
        let input = json!({
            "image": request.image_url,
            "prompt": request.prompt,
            "duration": request.duration_secs,
            "aspect_ratio": if request.height > request.width { "9:16" } else { "16:9" },
        });
        self.run(&request.model, &input).await
    }
}
