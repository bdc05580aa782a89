use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::{
    ImageGenerator, ImageRequest, PollPolicy, PollStatus, VideoGenerator, VideoRequest, poll_until,
};
use crate::core::llm::{GatewayError, check_status};

const PROVIDER: &str = "Runware";

/// Runware task API. Every call posts an array of tasks and receives a
/// `data` array keyed by `taskUUID`.
pub struct RunwareClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    policy: PollPolicy,
}

impl RunwareClient {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into(),
            policy,
        }
    }

    async fn send(&self, tasks: Value) -> Result<Vec<Value>, GatewayError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::MissingCredential("RUNWARE_API_KEY".to_string()))?;
        let res = self
            .client
            .post(&self.base_url)
            .bearer_auth(key)
            .json(&tasks)
            .send()
            .await
            .map_err(|e| GatewayError::transport(PROVIDER, e))?;
        let res = check_status(PROVIDER, res).await?;
        let status = res.status().as_u16();
        let body: Value = res
            .json()
            .await
            .map_err(|_| GatewayError::MissingContent(PROVIDER.to_string()))?;

        if let Some(first) = body
            .get("errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first())
        {
            let message = first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(GatewayError::Upstream {
                provider: PROVIDER.to_string(),
                status,
                body: message,
            });
        }

        match body.get("data") {
            Some(Value::Array(items)) => Ok(items.clone()),
            _ => Err(GatewayError::MissingContent(PROVIDER.to_string())),
        }
    }

    fn find_task<'a>(items: &'a [Value], task_uuid: &str) -> Option<&'a Value> {
        items
            .iter()
            .find(|item| item.get("taskUUID").and_then(Value::as_str) == Some(task_uuid))
    }

    async fn poll_video(&self, task_uuid: &str) -> Result<PollStatus<String>, GatewayError> {
        let items = self
            .send(json!([{ "taskType": "getResponse", "taskUUID": task_uuid }]))
            .await?;
        let Some(item) = Self::find_task(&items, task_uuid) else {
            return Ok(PollStatus::Pending);
        };
        let status = item.get("status").and_then(Value::as_str).unwrap_or("");
        Ok(match status {
            "success" => match item.get("videoURL").and_then(Value::as_str) {
                Some(url) => PollStatus::Done(url.to_string()),
                None => PollStatus::Failed("task finished without a video URL".to_string()),
            },
            "error" => PollStatus::Failed(
                item.get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("video task failed")
                    .to_string(),
            ),
            _ => PollStatus::Pending,
        })
    }
}

#[async_trait]
impl ImageGenerator for RunwareClient {
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, GatewayError> {
        let task_uuid = Uuid::new_v4().to_string();
        let mut task = json!({
            "taskType": "imageInference",
            "taskUUID": task_uuid,
            "positivePrompt": request.prompt,
            "model": request.model,
            "width": request.width,
            "height": request.height,
            "numberResults": 1,
            "outputType": "URL",
            "outputFormat": "JPG",
        });
        if let Some(reference) = &request.reference_image {
            task["referenceImages"] = json!([reference]);
        }

        let items = self.send(json!([task])).await?;
        Self::find_task(&items, &task_uuid)
            .or_else(|| items.first())
            .and_then(|item| item.get("imageURL"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GatewayError::MissingContent(PROVIDER.to_string()))
    }
}

#[async_trait]
impl VideoGenerator for RunwareClient {
    async fn image_to_video(&self, request: &VideoRequest) -> Result<String, GatewayError> {
        let task_uuid = Uuid::new_v4().to_string();
        let task = json!({
            "taskType": "videoInference",
            "taskUUID": task_uuid,
            "positivePrompt": request.prompt,
            "model": request.model,
            "duration": request.duration_secs,
            "width": request.width,
            "height": request.height,
            "numberResults": 1,
            "deliveryMethod": "async",
            "frameImages": [{ "inputImage": request.image_url, "frame": "first" }],
        });
        self.send(json!([task])).await?;
        info!("Runware video task {} submitted ({})", task_uuid, request.model);

        let task_uuid = task_uuid.as_str();
        poll_until(PROVIDER, self.policy, move |_| async move {
            self.poll_video(task_uuid).await
        })
        .await
    }
}
