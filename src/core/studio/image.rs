use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Studio, StudioError, non_blank, required};
use crate::core::catalog::{ToolType, recommended_model};
use crate::core::llm::{ChatMessage, GeneratedImage};
use crate::core::prompts::Language;
use crate::core::prompts::media::image_prompt;

fn default_style() -> String {
    "professional".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenRequest {
    pub prompt: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub product_image: Option<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Restage a supplied product photo.
    Edit,
    /// Create from text only.
    Generate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenResponse {
    pub image_url: String,
    pub images: Vec<String>,
    pub description: String,
    pub mode: ImageMode,
    pub style: String,
}

impl Studio {
    pub async fn generate_image(
        &self,
        request: &ImageGenRequest,
    ) -> Result<ImageGenResponse, StudioError> {
        let prompt = required(&request.prompt, "prompt")?;
        let reference = non_blank(request.product_image.as_deref());
        let mode = if reference.is_some() {
            ImageMode::Edit
        } else {
            ImageMode::Generate
        };
        let count = self.settings.variation_count(request.count, 1);
        let model = recommended_model(ToolType::Image);
        info!("generate-image: {:?} x{} with {}", mode, count, model);

        let text = image_prompt(prompt, &request.style, reference.is_some(), request.language);
        let messages = match reference {
            Some(url) => vec![ChatMessage::user_with_image(text, url)],
            None => vec![ChatMessage::user(text)],
        };

        let gateway = &self.gateway;
        let messages = &messages;
        let generated: Vec<GeneratedImage> = self
            .generate_all(count, move |_| async move {
                Ok(gateway.generate_image(model, messages).await?)
            })
            .await?;

        let description = generated
            .iter()
            .find_map(|g| g.text.as_deref().and_then(|t| non_blank(Some(t))))
            .unwrap_or(prompt)
            .to_string();
        let images: Vec<String> = generated.into_iter().map(|g| g.url).collect();

        Ok(ImageGenResponse {
            image_url: images[0].clone(),
            images,
            description,
            mode,
            style: request.style.clone(),
        })
    }
}
