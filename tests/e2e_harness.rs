#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;

pub type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub const GOOD_TOKEN: &str = "good-jwt";
pub const REEL_URL: &str = "https://replicate.delivery/reel.mp4";

/// Markers placed in a product name to make the mock gateway fail.
pub const RATE_LIMIT_MARKER: &str = "RATE_LIMIT_ME";
pub const NO_CREDITS_MARKER: &str = "NO_CREDITS_ME";

/// Every call the mock upstream received, as `(route, body)`.
#[derive(Clone, Default)]
pub struct UpstreamLog {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl UpstreamLog {
    fn push(&self, route: &str, body: Value) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((route.to_string(), body));
    }

    pub fn count(&self, route: &str) -> usize {
        self.bodies(route).len()
    }

    pub fn bodies(&self, route: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(r, _)| r == route)
            .map(|(_, b)| b.clone())
            .collect()
    }
}

/// One in-process server standing in for the AI gateway, Supabase,
/// Replicate and Runware.
pub struct MockUpstream {
    pub port: u16,
    pub log: UpstreamLog,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

fn user_text(body: &Value) -> String {
    body["messages"]
        .as_array()
        .map(|messages| {
            messages
                .iter()
                .filter(|m| m["role"] == "user")
                .map(|m| match &m["content"] {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

async fn chat_completions(State(log): State<UpstreamLog>, Json(body): Json<Value>) -> Response {
    log.push("chat", body.clone());
    let text = user_text(&body);
    if text.contains(RATE_LIMIT_MARKER) {
        return (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response();
    }
    if text.contains(NO_CREDITS_MARKER) {
        return (StatusCode::PAYMENT_REQUIRED, "no credits").into_response();
    }

    if body.get("modalities").is_some() {
        let n = log.count("chat");
        return Json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "Studio shot on marble",
                    "images": [{
                        "type": "image_url",
                        "image_url": { "url": format!("data:image/png;base64,SU1H{}", n) }
                    }]
                }
            }]
        }))
        .into_response();
    }

    let reply = "Here you go:\n```json\n{\"variations\":[{\"headline\":\"Sip slow\",\"cta\":\"Shop now\"}],\"caption\":\"Fresh drop\",\"hashtags\":[\"#mug\"]}\n```";
    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": reply } }]
    }))
    .into_response()
}

async fn supabase_user(State(log): State<UpstreamLog>, headers: HeaderMap) -> Response {
    log.push("auth", Value::Null);
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if bearer == format!("Bearer {}", GOOD_TOKEN) {
        Json(json!({ "id": "user-e2e", "email": "seller@example.com" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "invalid JWT" }))).into_response()
    }
}

async fn usage_logs(State(log): State<UpstreamLog>, Json(body): Json<Value>) -> StatusCode {
    log.push("usage", body);
    StatusCode::CREATED
}

async fn create_prediction(
    State(log): State<UpstreamLog>,
    Path((owner, name)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    log.push("replicate_create", json!({ "model": format!("{}/{}", owner, name), "body": body }));
    Json(json!({ "id": "pred-1", "status": "starting", "output": null }))
}

async fn get_prediction(State(log): State<UpstreamLog>, Path(id): Path<String>) -> Json<Value> {
    log.push("replicate_poll", Value::Null);
    if log.count("replicate_poll") < 2 {
        Json(json!({ "id": id, "status": "processing", "output": null }))
    } else {
        Json(json!({ "id": id, "status": "succeeded", "output": [REEL_URL] }))
    }
}

async fn runware(State(log): State<UpstreamLog>, Json(body): Json<Value>) -> Json<Value> {
    let task = body[0].clone();
    let uuid = task["taskUUID"].as_str().unwrap_or_default().to_string();
    match task["taskType"].as_str().unwrap_or_default() {
        "imageInference" => {
            log.push("runware_image", task);
            let n = log.count("runware_image");
            Json(json!({ "data": [{
                "taskType": "imageInference",
                "taskUUID": uuid,
                "imageURL": format!("https://im.runware.ai/ugc-{}.jpg", n)
            }]}))
        }
        "videoInference" => {
            log.push("runware_video", task);
            Json(json!({ "data": [{ "taskType": "videoInference", "taskUUID": uuid }] }))
        }
        _ => {
            log.push("runware_poll", task);
            Json(json!({ "data": [{
                "taskType": "getResponse",
                "taskUUID": uuid,
                "status": "success",
                "videoURL": format!("https://vid.runware.ai/{}.mp4", uuid)
            }]}))
        }
    }
}

impl MockUpstream {
    pub async fn start() -> TestResult<Self> {
        let log = UpstreamLog::default();
        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .route("/auth/v1/user", get(supabase_user))
            .route("/rest/v1/usage_logs", post(usage_logs))
            .route(
                "/replicate/v1/models/{owner}/{name}/predictions",
                post(create_prediction),
            )
            .route("/replicate/v1/predictions/{id}", get(get_prediction))
            .route("/runware", post(runware))
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            port,
            log,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

/// A running `adsmith serve` process wired to a [`MockUpstream`].
pub struct ServerHarness {
    child: Child,
    pub api_base: String,
    dir: TempDir,
}

impl ServerHarness {
    pub async fn spawn(upstream: &MockUpstream) -> TestResult<Self> {
        let port = find_free_port()?;
        let dir = tempfile::tempdir()?;
        let config_path = dir.path().join("adsmith.toml");
        let mock = upstream.base_url();
        std::fs::write(
            &config_path,
            format!(
                r#"[upstream]
gateway_url = "{mock}/v1/chat/completions"
replicate_url = "{mock}/replicate"
runware_url = "{mock}/runware"

[polling]
interval_ms = 10
max_attempts = 20

[generation]
max_variations = 4
"#
            ),
        )?;

        let log_file = std::fs::File::create(dir.path().join("server.log"))?;
        let log_file_err = log_file.try_clone()?;
        let child = Command::new(binary_path())
            .arg("serve")
            .arg("--host")
            .arg("127.0.0.1")
            .arg("--port")
            .arg(port.to_string())
            .arg("--config")
            .arg(&config_path)
            .env("LOVABLE_API_KEY", "test-gateway-key")
            .env("REPLICATE_API_TOKEN", "test-replicate-token")
            .env("RUNWARE_API_KEY", "test-runware-key")
            .env("SUPABASE_URL", &mock)
            .env("SUPABASE_ANON_KEY", "anon")
            .env("SUPABASE_SERVICE_ROLE_KEY", "service")
            .env_remove("OPENROUTER_API_KEY")
            .stdout(Stdio::from(log_file))
            .stderr(Stdio::from(log_file_err))
            .spawn()?;

        let mut harness = Self {
            child,
            api_base: format!("http://127.0.0.1:{}", port),
            dir,
        };
        harness.wait_until_ready().await?;
        Ok(harness)
    }

    pub fn server_log(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("server.log")).unwrap_or_default()
    }

    async fn wait_until_ready(&mut self) -> TestResult<()> {
        for _ in 0..80 {
            if let Some(status) = self.child.try_wait()? {
                return Err(format!(
                    "adsmith exited early with status {}:\n{}",
                    status,
                    self.server_log()
                )
                .into());
            }
            let res = reqwest::Client::new()
                .get(format!("{}/api/health", self.api_base))
                .timeout(Duration::from_millis(700))
                .send()
                .await;
            if let Ok(resp) = res
                && resp.status().is_success()
            {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        Err("Timed out waiting for adsmith API readiness".into())
    }

    pub async fn get(&self, path: &str) -> TestResult<(u16, Value)> {
        let resp = reqwest::Client::new()
            .get(format!("{}{}", self.api_base, path))
            .timeout(Duration::from_secs(30))
            .send()
            .await?;
        read(resp).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResult<(u16, Value)> {
        let mut req = reqwest::Client::new()
            .post(format!("{}{}", self.api_base, path))
            .timeout(Duration::from_secs(30))
            .json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        read(req.send().await?).await
    }
}

impl Drop for ServerHarness {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

async fn read(resp: reqwest::Response) -> TestResult<(u16, Value)> {
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "raw": text }));
    Ok((status, body))
}

pub fn find_free_port() -> TestResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_adsmith"))
}

/// Sandboxes without socket permissions skip the end-to-end suite.
pub fn bind_not_permitted(err: &(dyn std::error::Error + Send + Sync)) -> bool {
    err.to_string().contains("Operation not permitted")
}
