use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::info;

use super::{Studio, StudioError};
use crate::core::catalog::{self, DEFAULT_CHAT_MODEL, ToolType};
use crate::core::prompts::Language;
use crate::core::prompts::tools::build_tool_prompt;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub tool_type: String,
    #[serde(default)]
    pub input: Map<String, Value>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub result: Value,
    pub model: String,
}

/// Model for a text generation: the requested id when the tool offers it,
/// otherwise the tool's default, and always a chat-capable text model.
pub fn resolve_model(tool: ToolType, requested: Option<&str>) -> &'static str {
    let offered = catalog::models_for_tool(tool);
    let chosen = requested
        .and_then(|id| offered.iter().find(|m| m.id == id).copied())
        .or_else(|| catalog::find_model(catalog::recommended_model(tool)));
    match chosen {
        Some(model) if model.is_text_chat() => model.id.as_str(),
        _ => DEFAULT_CHAT_MODEL,
    }
}

/// Ads replies are normalized to `{ "variations": [...] }` even when the
/// model returns a bare array.
fn normalize(tool: ToolType, result: Value) -> Value {
    match (tool, result) {
        (ToolType::Ads, Value::Array(items)) => json!({ "variations": items }),
        (_, other) => other,
    }
}

impl Studio {
    pub async fn ai_generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, StudioError> {
        let tool: ToolType = request.tool_type.parse().map_err(StudioError::Validation)?;
        if request.input.is_empty() {
            return Err(StudioError::validation("input is required"));
        }
        let model = resolve_model(tool, request.model.as_deref());
        info!(
            "ai-generate: tool={} model={} lang={}",
            tool,
            model,
            request.language.code()
        );

        let prompt = build_tool_prompt(tool, &request.input, request.language);
        let result = self.complete_json(model, prompt.messages()).await?;
        Ok(GenerateResponse {
            result: normalize(tool, result),
            model: model.to_string(),
        })
    }
}
