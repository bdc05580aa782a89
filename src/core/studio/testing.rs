//! Scriptable upstream stubs for studio and handler tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{Studio, StudioSettings};
use crate::core::llm::{ChatGateway, ChatMessage, ChatRequest, GatewayError, GeneratedImage};
use crate::core::media::{ImageGenerator, ImageRequest, VideoGenerator, VideoRequest};

type TextFn = Box<dyn Fn(&ChatRequest) -> Result<String, GatewayError> + Send + Sync>;
type GatewayImageFn =
    Box<dyn Fn(&str, &[ChatMessage]) -> Result<GeneratedImage, GatewayError> + Send + Sync>;
type ImageFn = Box<dyn Fn(usize, &ImageRequest) -> Result<String, GatewayError> + Send + Sync>;
type VideoFn = Box<dyn Fn(usize, &VideoRequest) -> Result<String, GatewayError> + Send + Sync>;

pub(crate) struct StubGateway {
    text: TextFn,
    image: GatewayImageFn,
    requests: Mutex<Vec<ChatRequest>>,
    image_calls: AtomicUsize,
}

impl StubGateway {
    pub fn with(text: impl Fn(&ChatRequest) -> Result<String, GatewayError> + Send + Sync + 'static) -> Self {
        Self {
            text: Box::new(text),
            image: Box::new(|_, _| Err(GatewayError::MissingContent("stub".to_string()))),
            requests: Mutex::new(Vec::new()),
            image_calls: AtomicUsize::new(0),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with(move |_| Ok(text.clone()))
    }

    pub fn images(
        mut self,
        image: impl Fn(&str, &[ChatMessage]) -> Result<GeneratedImage, GatewayError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.image = Box::new(image);
        self
    }

    pub fn request(&self, idx: usize) -> ChatRequest {
        self.requests.lock().unwrap()[idx].clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatGateway for StubGateway {
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.text)(request)
    }

    async fn generate_image(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<GeneratedImage, GatewayError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push(ChatRequest::new(model, messages.to_vec()));
        (self.image)(model, messages)
    }
}

/// Image and video generator driven by closures that receive the 0-based
/// call index.
pub(crate) struct StubMedia {
    image: ImageFn,
    video: VideoFn,
    image_calls: AtomicUsize,
    video_calls: AtomicUsize,
    videos: Mutex<Vec<VideoRequest>>,
}

impl Default for StubMedia {
    fn default() -> Self {
        Self {
            image: Box::new(|i, _| Ok(format!("https://img.test/{}.jpg", i))),
            video: Box::new(|i, _| Ok(format!("https://vid.test/{}.mp4", i))),
            image_calls: AtomicUsize::new(0),
            video_calls: AtomicUsize::new(0),
            videos: Mutex::new(Vec::new()),
        }
    }
}

impl StubMedia {
    pub fn images(
        mut self,
        image: impl Fn(usize, &ImageRequest) -> Result<String, GatewayError> + Send + Sync + 'static,
    ) -> Self {
        self.image = Box::new(image);
        self
    }

    pub fn videos(
        mut self,
        video: impl Fn(usize, &VideoRequest) -> Result<String, GatewayError> + Send + Sync + 'static,
    ) -> Self {
        self.video = Box::new(video);
        self
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn video_calls(&self) -> usize {
        self.video_calls.load(Ordering::SeqCst)
    }

    pub fn video_request(&self, idx: usize) -> VideoRequest {
        self.videos.lock().unwrap()[idx].clone()
    }
}

#[async_trait]
impl ImageGenerator for StubMedia {
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, GatewayError> {
        let idx = self.image_calls.fetch_add(1, Ordering::SeqCst);
        (self.image)(idx, request)
    }
}

#[async_trait]
impl VideoGenerator for StubMedia {
    async fn image_to_video(&self, request: &VideoRequest) -> Result<String, GatewayError> {
        let idx = self.video_calls.fetch_add(1, Ordering::SeqCst);
        self.videos.lock().unwrap().push(request.clone());
        (self.video)(idx, request)
    }
}

/// A studio where reels, UGC images and UGC videos all go to `media`.
pub(crate) fn studio_with(
    gateway: StubGateway,
    media: StubMedia,
) -> (Studio, Arc<StubGateway>, Arc<StubMedia>) {
    let gateway = Arc::new(gateway);
    let media = Arc::new(media);
    let studio = Studio::new(
        gateway.clone(),
        media.clone(),
        media.clone(),
        media.clone(),
        StudioSettings::default(),
    );
    (studio, gateway, media)
}
