pub mod replicate;
pub mod runware;

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::core::llm::GatewayError;

pub use replicate::ReplicateClient;
pub use runware::RunwareClient;

/// Fixed-interval polling budget for asynchronous generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus<T> {
    Pending,
    Done(T),
    Failed(String),
}

/// Sleeps `interval`, probes, and repeats until the probe reports a terminal
/// state or `max_attempts` probes have been made. The probe receives the
/// 1-based attempt number.
pub async fn poll_until<T, F, Fut>(
    provider: &str,
    policy: PollPolicy,
    mut probe: F,
) -> Result<T, GatewayError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PollStatus<T>, GatewayError>>,
{
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;
        match probe(attempt).await? {
            PollStatus::Done(value) => {
                debug!("{} finished after {} polls", provider, attempt);
                return Ok(value);
            }
            PollStatus::Failed(message) => {
                return Err(GatewayError::Failed {
                    provider: provider.to_string(),
                    message,
                });
            }
            PollStatus::Pending => {}
        }
    }
    Err(GatewayError::Timeout {
        provider: provider.to_string(),
        attempts: policy.max_attempts,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub reference_image: Option<String>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub model: String,
    pub prompt: String,
    pub image_url: String,
    pub duration_secs: u32,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Returns the URL of the generated image.
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, GatewayError>;
}

#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Animates a still image and returns the URL of the video.
    async fn image_to_video(&self, request: &VideoRequest) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn stops_at_first_terminal_state() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = poll_until("test", fast(10), move |attempt| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok(if attempt < 4 {
                    PollStatus::Pending
                } else {
                    PollStatus::Done("url")
                })
            }
        })
        .await
        .unwrap();
        assert_eq!(result, "url");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn exhausting_attempts_is_a_timeout() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let err = poll_until::<(), _, _>("replicate", fast(60), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(PollStatus::Pending) }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, GatewayError::Timeout { attempts: 60, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 60);
    }

    #[tokio::test]
    async fn failed_status_surfaces_message() {
        let err = poll_until::<(), _, _>("runware", fast(5), |_| async {
            Ok(PollStatus::Failed("NSFW content detected".to_string()))
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("NSFW content detected"));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_one_interval_before_each_probe() {
        let start = tokio::time::Instant::now();
        let _ = poll_until("test", PollPolicy::default(), |attempt| async move {
            Ok(if attempt == 3 {
                PollStatus::Done(())
            } else {
                PollStatus::Pending
            })
        })
        .await;
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }
}
