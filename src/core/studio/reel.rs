use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Studio, StudioError, non_blank, required};
use crate::core::catalog::DEFAULT_CHAT_MODEL;
use crate::core::coerce::parse_model_as;
use crate::core::media::VideoRequest;
use crate::core::prompts::Language;
use crate::core::prompts::media::{reel_caption, reel_video_prompt};

const REEL_WIDTH: u32 = 480;
const REEL_HEIGHT: u32 = 832;

fn default_style() -> String {
    "smooth".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelRequest {
    pub image_url: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelResponse {
    pub video_url: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub duration: u32,
    pub style: String,
    pub format: &'static str,
    pub aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
struct Caption {
    caption: String,
    #[serde(default)]
    hashtags: Vec<String>,
}

/// Clip length supported by the video model: 5 or 10 seconds.
pub fn clamp_duration(requested: Option<u32>) -> u32 {
    match requested {
        Some(secs) if secs > 5 => 10,
        _ => 5,
    }
}

fn fallback_caption(product: &str, lang: Language) -> Caption {
    let caption = match lang {
        Language::Arabic => format!("✨ {} ✨ اطلبه الآن!", product),
        Language::English => format!("✨ {} ✨ Get yours today!", product),
    };
    Caption {
        caption,
        hashtags: ["#reels", "#fyp", "#shopping"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

impl Studio {
    /// Animates a product photo into a vertical reel and writes its caption.
    /// The caption is best-effort; the video is not.
    pub async fn generate_reel(&self, request: &ReelRequest) -> Result<ReelResponse, StudioError> {
        let image_url = required(&request.image_url, "imageUrl")?;
        let lang = request.language;
        let product = non_blank(Some(request.product_name.as_str()))
            .unwrap_or_else(|| lang.pick("المنتج", "this product"));
        let duration = clamp_duration(request.duration);
        info!(
            "generate-reel: {}s '{}' with {}",
            duration, request.style, self.settings.reel_model
        );

        let video = VideoRequest {
            model: self.settings.reel_model.clone(),
            prompt: reel_video_prompt(product, &request.style),
            image_url: image_url.to_string(),
            duration_secs: duration,
            width: REEL_WIDTH,
            height: REEL_HEIGHT,
        };
        let caption_prompt = reel_caption(product, &request.style, lang);

        let (video_url, caption) = tokio::join!(
            self.reels.image_to_video(&video),
            self.complete_text(DEFAULT_CHAT_MODEL, caption_prompt.messages()),
        );
        let video_url = video_url?;
        let caption = caption
            .and_then(|text| Ok(parse_model_as::<Caption>(&text)?))
            .unwrap_or_else(|e| {
                warn!("Reel caption failed, using fallback: {}", e);
                fallback_caption(product, lang)
            });

        Ok(ReelResponse {
            video_url,
            caption: caption.caption,
            hashtags: caption.hashtags,
            duration,
            style: request.style.clone(),
            format: "mp4",
            aspect_ratio: "9:16",
        })
    }
}
