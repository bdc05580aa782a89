use serde::Deserialize;

use super::{Brief, Language, PromptPair, json_system};

const PHOTO_SHAPE: &str = r#"{"main_prompt":"...","negative_prompt":"...","variations":[{"name":"...","prompt":"..."}],"recommended_settings":{"aspect_ratio":"...","lighting":"...","camera_angle":"...","lens":"..."}}"#;

/// Brief for the product-photo prompt writer. Field names follow the public
/// request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhotoBrief {
    pub product_text: String,
    pub product_image_provided: bool,
    pub usage: Option<String>,
    pub style: Option<String>,
    pub background: Option<String>,
    pub platform: Option<String>,
    pub user_ideas: Option<String>,
}

/// Aspect ratio that suits where the photo will be posted.
pub fn platform_aspect(platform: Option<&str>) -> &'static str {
    let platform = platform.unwrap_or("").trim().to_lowercase();
    match platform.as_str() {
        "tiktok" | "snapchat" | "story" | "stories" | "reels" => "9:16",
        "instagram" | "instagram_feed" => "4:5",
        "facebook" | "meta" => "1:1",
        "pinterest" => "2:3",
        "banner" | "website" | "youtube" => "16:9",
        _ => "1:1",
    }
}

pub fn photo_prompt(brief: &PhotoBrief) -> PromptPair {
    let role = "You are a commercial product photographer and prompt engineer. You turn a seller's brief into precise prompts for image models such as FLUX and Gemini.";
    let mut user = Brief::default()
        .line("Product", Some(brief.product_text.as_str()))
        .line("Used for", brief.usage.as_deref())
        .line("Style", brief.style.as_deref())
        .line("Background", brief.background.as_deref())
        .line("Platform", brief.platform.as_deref())
        .line("Seller ideas", brief.user_ideas.as_deref())
        .line(
            "Target aspect ratio",
            Some(platform_aspect(brief.platform.as_deref())),
        );
    if brief.product_image_provided {
        user = user.text("A reference photo of the product will be supplied to the image model; prompts must say to keep the product unchanged.");
    }
    let user = user
        .text("")
        .text("Write one main prompt, a negative prompt, 3 alternative variations and recommended settings. Prompts must be in English.")
        .finish();

    PromptPair {
        system: json_system(role, Language::English, PHOTO_SHAPE),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_follows_platform() {
        assert_eq!(platform_aspect(Some("TikTok")), "9:16");
        assert_eq!(platform_aspect(Some("instagram")), "4:5");
        assert_eq!(platform_aspect(None), "1:1");
    }

    #[test]
    fn prompt_carries_brief_and_reference_note() {
        let brief = PhotoBrief {
            product_text: "Ceramic coffee mug".to_string(),
            product_image_provided: true,
            platform: Some("tiktok".to_string()),
            background: Some("marble".to_string()),
            ..Default::default()
        };
        let pair = photo_prompt(&brief);
        assert!(pair.user.contains("Product: Ceramic coffee mug"));
        assert!(pair.user.contains("Target aspect ratio: 9:16"));
        assert!(pair.user.contains("keep the product unchanged"));
        assert!(!pair.user.contains("Seller ideas"));
        assert!(pair.system.contains("negative_prompt"));
    }
}
