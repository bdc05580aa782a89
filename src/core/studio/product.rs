use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{Studio, StudioError, non_blank, required};
use crate::core::catalog::{ToolType, recommended_model};
use crate::core::coerce::parse_or_wrap;
use crate::core::prompts::Language;
use crate::core::prompts::product::{ProductBrief, analyze_product};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeProductRequest {
    pub product_name: String,
    pub product_description: Option<String>,
    pub category: Option<String>,
    pub target_audience: Option<String>,
    /// URL or data URI of a product photo.
    pub product_image: Option<String>,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeProductResponse {
    pub success: bool,
    pub analysis: Value,
    pub product_name: String,
    pub analyzed_at: DateTime<Utc>,
}

impl Studio {
    /// Market analysis of a product. A reply without recoverable JSON is
    /// returned as `{ "summary": <text> }` rather than failing.
    pub async fn analyze_product(
        &self,
        request: &AnalyzeProductRequest,
    ) -> Result<AnalyzeProductResponse, StudioError> {
        let name = required(&request.product_name, "productName")?;
        let image = non_blank(request.product_image.as_deref());
        let brief = ProductBrief {
            name,
            description: non_blank(request.product_description.as_deref()),
            category: non_blank(request.category.as_deref()),
            target_audience: non_blank(request.target_audience.as_deref()),
            has_image: image.is_some(),
        };

        let model = recommended_model(ToolType::Analysis);
        info!("analyze-product: '{}' with {} (image: {})", name, model, image.is_some());
        let prompt = analyze_product(&brief, request.language);
        let text = self
            .complete_text(model, prompt.messages_with_image(image))
            .await?;

        Ok(AnalyzeProductResponse {
            success: true,
            analysis: parse_or_wrap(&text, "summary"),
            product_name: name.to_string(),
            analyzed_at: Utc::now(),
        })
    }
}
