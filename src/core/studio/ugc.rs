use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Studio, StudioError, non_blank};
use crate::core::catalog::{self, ModelCategory, ToolType};
use crate::core::media::{ImageRequest, VideoRequest};
use crate::core::prompts::Language;
use crate::core::prompts::media::{UgcScene, ugc_scenes, ugc_tips};

/// Assets per request when the caller does not ask for a count.
pub const DEFAULT_UGC_COUNT: usize = 3;

const IMAGE_WIDTH: u32 = 768;
const IMAGE_HEIGHT: u32 = 1344;
const VIDEO_WIDTH: u32 = 720;
const VIDEO_HEIGHT: u32 = 1280;
const VIDEO_SECONDS: u32 = 10;

fn default_ugc_type() -> String {
    "testimonial".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UgcRequest {
    #[serde(default)]
    pub product_image: Option<String>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default = "default_ugc_type")]
    pub ugc_type: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UgcVideo {
    /// Video URL, or the still image when animation failed.
    pub video_url: String,
    pub thumbnail_url: String,
    pub scene: String,
    pub caption: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_ar: String,
    pub is_video: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UgcResponse {
    pub videos: Vec<UgcVideo>,
    pub ugc_type: String,
    pub count: usize,
    pub tips: Vec<String>,
}

/// Video model for UGC clips: the requested id when it is a UGC model in the
/// catalog, otherwise the tool default.
pub fn resolve_video_model(requested: Option<&str>) -> &'static str {
    requested
        .and_then(catalog::find_model)
        .filter(|m| m.category == ModelCategory::Ugc)
        .map(|m| m.id.as_str())
        .unwrap_or_else(|| catalog::recommended_model(ToolType::Ugc))
}

impl Studio {
    /// Generates a set of UGC-style clips, one scene at a time: a still
    /// image first, then an image-to-video pass. A failed video keeps the
    /// still; a failed still drops the scene.
    pub async fn generate_ugc(&self, request: &UgcRequest) -> Result<UgcResponse, StudioError> {
        let lang = request.language;
        let product = non_blank(Some(request.product_name.as_str()))
            .unwrap_or_else(|| lang.pick("المنتج", "the product"));
        let reference = non_blank(request.product_image.as_deref());
        let count = self
            .settings
            .variation_count(request.count, DEFAULT_UGC_COUNT);
        let video_model = resolve_video_model(request.model.as_deref());
        let scenes = ugc_scenes(&request.ugc_type);
        info!(
            "generate-ugc: {} x{} with {} then {}",
            request.ugc_type, count, self.settings.ugc_image_model, video_model
        );

        let scenes = &scenes;
        let videos = self
            .generate_all(count, move |idx| async move {
                let scene = &scenes[idx % scenes.len()];
                self.ugc_clip(scene, product, reference, video_model, lang)
                    .await
            })
            .await?;

        Ok(UgcResponse {
            count: videos.len(),
            videos,
            ugc_type: request.ugc_type.clone(),
            tips: ugc_tips(&request.ugc_type, lang),
        })
    }

    async fn ugc_clip(
        &self,
        scene: &UgcScene,
        product: &str,
        reference: Option<&str>,
        video_model: &str,
        lang: Language,
    ) -> Result<UgcVideo, StudioError> {
        let image_url = self
            .ugc_images
            .generate_image(&ImageRequest {
                model: self.settings.ugc_image_model.clone(),
                prompt: scene.image_prompt(product),
                reference_image: reference.map(str::to_string),
                width: IMAGE_WIDTH,
                height: IMAGE_HEIGHT,
            })
            .await?;

        let video = self
            .ugc_videos
            .image_to_video(&VideoRequest {
                model: video_model.to_string(),
                prompt: scene.video_prompt(product),
                image_url: image_url.clone(),
                duration_secs: VIDEO_SECONDS,
                width: VIDEO_WIDTH,
                height: VIDEO_HEIGHT,
            })
            .await;
        let (video_url, is_video) = match video {
            Ok(url) => (url, true),
            Err(e) => {
                warn!("UGC {} clip fell back to still image: {}", scene.kind, e);
                (image_url.clone(), false)
            }
        };

        Ok(UgcVideo {
            video_url,
            thumbnail_url: image_url,
            scene: scene.description(lang).to_string(),
            caption: format!("{} | {}", scene.label(lang), product),
            kind: scene.kind.to_string(),
            type_ar: scene.kind_ar.to_string(),
            is_video,
        })
    }
}
