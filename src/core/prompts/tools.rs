use serde_json::{Map, Value};

use super::{Brief, Language, PromptPair, field, json_system};
use crate::core::catalog::ToolType;

const ADS_SHAPE: &str = r#"{"variations":[{"headline":"...","primaryText":"...","description":"...","cta":"...","angle":"..."}]}"#;
const PRODUCT_SHAPE: &str = r#"{"title":"...","shortDescription":"...","description":"...","bulletPoints":["..."],"keywords":["..."]}"#;
const SEO_SHAPE: &str = r#"{"metaTitle":"...","metaDescription":"...","slug":"...","keywords":["..."],"altText":"..."}"#;
const ANALYSIS_SHAPE: &str = r#"{"score":0,"strengths":["..."],"weaknesses":["..."],"opportunities":["..."],"recommendations":["..."]}"#;
const IMAGE_SHAPE: &str = r#"{"prompts":[{"title":"...","prompt":"...","style":"..."}]}"#;
const SCRIPT_SHAPE: &str = r#"{"hook":"...","scenes":[{"scene":1,"duration":"0-3s","visual":"...","voiceover":"...","onScreenText":"..."}],"caption":"...","hashtags":["..."]}"#;
const UGC_SHAPE: &str = r#"{"scripts":[{"type":"...","hook":"...","script":"...","cta":"..."}]}"#;

/// Number of ad variations requested from the model.
pub const AD_VARIATIONS: usize = 3;

pub fn output_shape(tool: ToolType) -> &'static str {
    match tool {
        ToolType::Ads => ADS_SHAPE,
        ToolType::Product => PRODUCT_SHAPE,
        ToolType::Seo => SEO_SHAPE,
        ToolType::Analysis => ANALYSIS_SHAPE,
        ToolType::Image => IMAGE_SHAPE,
        ToolType::Reels | ToolType::Video => SCRIPT_SHAPE,
        ToolType::Ugc => UGC_SHAPE,
    }
}

fn role(tool: ToolType) -> &'static str {
    match tool {
        ToolType::Ads => {
            "You are a senior performance marketer who writes high-converting ad copy for e-commerce brands."
        }
        ToolType::Product => {
            "You are an expert e-commerce copywriter who writes persuasive, scannable product pages."
        }
        ToolType::Seo => "You are an SEO specialist for online stores.",
        ToolType::Analysis => {
            "You are an e-commerce consultant who audits product listings and marketing plans."
        }
        ToolType::Image => {
            "You are an art director who writes prompts for AI product photography."
        }
        ToolType::Reels | ToolType::Video => {
            "You are a short-form video producer who scripts scroll-stopping reels for products."
        }
        ToolType::Ugc => {
            "You write authentic user-generated-content scripts that feel filmed by real customers on a phone."
        }
    }
}

fn task(tool: ToolType, input: &Map<String, Value>) -> String {
    match tool {
        ToolType::Ads => format!(
            "Write exactly {} distinct ad variations for {}. Each needs a short headline, primary text, a one-line description and a clear call to action.",
            AD_VARIATIONS,
            field(input, "platform").unwrap_or_else(|| "social media".to_string())
        ),
        ToolType::Product => "Write a complete product description: a title, a one-sentence hook, a full description, 5 bullet points and 8 search keywords.".to_string(),
        ToolType::Seo => "Write SEO metadata: a title under 60 characters, a meta description under 155 characters, a URL slug, 10 keywords and image alt text.".to_string(),
        ToolType::Analysis => "Audit this product and its positioning. Score it from 0 to 100 and list strengths, weaknesses, opportunities and concrete recommendations.".to_string(),
        ToolType::Image => "Write 3 detailed image-generation prompts (in English) for product photos of this item, each with a short title and style label.".to_string(),
        ToolType::Reels | ToolType::Video => format!(
            "Script a {}-second vertical video: a hook for the first 3 seconds, then scenes with visuals, voiceover and on-screen text, then a caption and hashtags.",
            field(input, "duration").unwrap_or_else(|| "15".to_string())
        ),
        ToolType::Ugc => "Write 3 UGC video scripts of different types (testimonial, unboxing, how-to). Each needs a hook, a natural spoken script under 40 words and a call to action.".to_string(),
    }
}

/// Prompt for the generic `ai-generate` endpoint.
pub fn build_tool_prompt(tool: ToolType, input: &Map<String, Value>, lang: Language) -> PromptPair {
    let user = Brief::default()
        .line("Product", field(input, "productName"))
        .line("Description", field(input, "productDescription"))
        .line("Category", field(input, "category"))
        .line("Price", field(input, "price"))
        .line("Target audience", field(input, "targetAudience"))
        .line("Platform", field(input, "platform"))
        .line("Tone", field(input, "tone"))
        .line("Style", field(input, "style"))
        .line("Offer", field(input, "offer"))
        .line("Keywords", field(input, "keywords"))
        .line("Extra notes", field(input, "notes"))
        .text("")
        .text(task(tool, input))
        .finish();

    PromptPair {
        system: json_system(role(tool), lang, output_shape(tool)),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn every_tool_prompt_embeds_its_shape_and_language() {
        let data = input(json!({ "productName": "Black Dress" }));
        for tool in ToolType::ALL {
            let pair = build_tool_prompt(tool, &data, Language::Arabic);
            assert!(pair.system.contains(output_shape(tool)), "{tool}");
            assert!(pair.system.contains("Arabic"), "{tool}");
            assert!(pair.user.contains("Product: Black Dress"), "{tool}");
        }
    }

    #[test]
    fn ads_prompt_asks_for_three_variations_on_platform() {
        let data = input(json!({ "productName": "Black Dress", "platform": "TikTok" }));
        let pair = build_tool_prompt(ToolType::Ads, &data, Language::English);
        assert!(pair.user.contains("exactly 3"));
        assert!(pair.user.contains("TikTok"));
        assert!(pair.system.contains("\"variations\""));
        assert!(pair.system.contains("Respond in English."));
    }

    #[test]
    fn missing_optional_fields_are_omitted() {
        let data = input(json!({ "productName": "Mug", "tone": "" }));
        let pair = build_tool_prompt(ToolType::Product, &data, Language::English);
        assert!(!pair.user.contains("Tone:"));
        assert!(!pair.user.contains("Price:"));
        assert!(!pair.user.contains("Platform:"));
    }

    #[test]
    fn reels_prompt_uses_requested_duration() {
        let data = input(json!({ "productName": "Mug", "duration": 30 }));
        let pair = build_tool_prompt(ToolType::Reels, &data, Language::English);
        assert!(pair.user.contains("30-second"));
        let default = build_tool_prompt(ToolType::Video, &input(json!({})), Language::English);
        assert!(default.user.contains("15-second"));
    }
}
