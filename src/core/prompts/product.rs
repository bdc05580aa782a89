use super::{Brief, Language, PromptPair, json_system};

const ANALYSIS_SHAPE: &str = r#"{"summary":"...","score":0,"targetAudience":{"primary":"...","secondary":"...","painPoints":["..."]},"sellingPoints":["..."],"pricing":{"positioning":"budget|mid|premium","suggestion":"..."},"marketingAngles":["..."],"recommendedPlatforms":["..."],"improvements":["..."]}"#;

pub struct ProductBrief<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub target_audience: Option<&'a str>,
    pub has_image: bool,
}

pub fn analyze_product(brief: &ProductBrief<'_>, lang: Language) -> PromptPair {
    let role = "You are a senior e-commerce strategist. You evaluate products for online sellers in the Middle East and worldwide and give practical, specific advice.";

    let mut user = Brief::default()
        .line("Product name", Some(brief.name))
        .line("Description", brief.description)
        .line("Category", brief.category)
        .line("Intended audience", brief.target_audience);
    if brief.has_image {
        user = user.text("The attached image shows the product; use what you see in it.");
    }
    let user = user
        .text("")
        .text("Analyse this product's market potential. Score it from 0 to 100, identify the ideal audience, the strongest selling points, a pricing position, marketing angles, the best sales platforms and concrete improvements.")
        .finish();

    PromptPair {
        system: json_system(role, lang, ANALYSIS_SHAPE),
        user,
    }
}
