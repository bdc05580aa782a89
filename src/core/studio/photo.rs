use serde_json::Value;
use tracing::info;

use super::{Studio, StudioError, required};
use crate::core::catalog::DEFAULT_CHAT_MODEL;
use crate::core::prompts::photo::{PhotoBrief, photo_prompt};

impl Studio {
    /// Turns a seller's photo brief into image-model prompts.
    pub async fn product_photo_prompt(&self, brief: &PhotoBrief) -> Result<Value, StudioError> {
        required(&brief.product_text, "product_text")?;
        info!(
            "product-photo-prompt: platform={} image={}",
            brief.platform.as_deref().unwrap_or("-"),
            brief.product_image_provided
        );
        self.complete_json(DEFAULT_CHAT_MODEL, photo_prompt(brief).messages())
            .await
    }
}
