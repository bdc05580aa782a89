//! In-process upstream mocks for provider and handler tests.

use axum::Router;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

pub(crate) struct MockServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock server should bind");
        let addr = listener.local_addr().expect("mock server has an address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            base_url: format!("http://{}", addr),
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub headers: HeaderMap,
    pub body: Value,
}

/// Shared log of requests a mock handler received.
#[derive(Clone, Default)]
pub(crate) struct RequestLog(Arc<Mutex<Vec<Recorded>>>);

impl RequestLog {
    pub fn push(&self, headers: HeaderMap, body: Value) {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Recorded { headers, body });
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn get(&self, idx: usize) -> Recorded {
        self.0.lock().unwrap_or_else(|e| e.into_inner())[idx].clone()
    }
}

/// An OpenAI-style chat completion body carrying `content`.
pub(crate) fn chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}
