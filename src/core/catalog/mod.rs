//! Static catalog of the hosted models the studio can route to.
//!
//! The model list is compiled in from `models.json` and parsed once on first
//! use. The per-tool default is a plain `match` so that adding a [`ToolType`]
//! without a default fails to compile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const MODELS_JSON: &str = include_str!("models.json");

static CATALOG: LazyLock<ModelCatalog> = LazyLock::new(ModelCatalog::load);

/// Chat model used when a text request resolves to something that cannot chat.
pub const DEFAULT_CHAT_MODEL: &str = "google/gemini-2.5-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Image,
    Reels,
    Ads,
    Product,
    Seo,
    Analysis,
    Ugc,
    Video,
}

impl ToolType {
    pub const ALL: [ToolType; 8] = [
        ToolType::Image,
        ToolType::Reels,
        ToolType::Ads,
        ToolType::Product,
        ToolType::Seo,
        ToolType::Analysis,
        ToolType::Ugc,
        ToolType::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::Image => "image",
            ToolType::Reels => "reels",
            ToolType::Ads => "ads",
            ToolType::Product => "product",
            ToolType::Seo => "seo",
            ToolType::Analysis => "analysis",
            ToolType::Ugc => "ugc",
            ToolType::Video => "video",
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ToolType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown tool type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Fast,
    Balanced,
    Pro,
    Image,
    Video,
    Ugc,
}

impl ModelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCategory::Fast => "fast",
            ModelCategory::Balanced => "balanced",
            ModelCategory::Pro => "pro",
            ModelCategory::Image => "image",
            ModelCategory::Video => "video",
            ModelCategory::Ugc => "ugc",
        }
    }

    /// Categories reserved for media tools; text tools never see them.
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            ModelCategory::Image | ModelCategory::Video | ModelCategory::Ugc
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Lovable,
    Openrouter,
    Runware,
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::Lovable => "lovable",
            ModelProvider::Openrouter => "openrouter",
            ModelProvider::Runware => "runware",
        }
    }

    /// Whether the provider speaks the chat-completions protocol.
    pub fn is_chat(&self) -> bool {
        matches!(self, ModelProvider::Lovable | ModelProvider::Openrouter)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiModel {
    pub id: String,
    pub name: String,
    pub localized_name: String,
    pub provider: ModelProvider,
    pub category: ModelCategory,
    pub supported_tools: Vec<ToolType>,
}

impl AiModel {
    /// A text model reachable through a chat-completions provider.
    pub fn is_text_chat(&self) -> bool {
        self.provider.is_chat() && !self.category.is_media()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelCatalog {
    pub models: Vec<AiModel>,
}

impl ModelCatalog {
    fn load() -> Self {
        serde_json::from_str(MODELS_JSON).expect("models.json is invalid")
    }

    pub fn find(&self, id: &str) -> Option<&AiModel> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn models_for_tool(&self, tool: Option<ToolType>) -> Vec<&AiModel> {
        self.models
            .iter()
            .filter(|m| category_allowed(tool, m.category))
            .collect()
    }
}

/// The process-wide catalog.
pub fn catalog() -> &'static ModelCatalog {
    &CATALOG
}

pub fn find_model(id: &str) -> Option<&'static AiModel> {
    catalog().find(id)
}

/// Default model id for a tool.
pub fn recommended_model(tool: ToolType) -> &'static str {
    match tool {
        ToolType::Image => "google/gemini-2.5-flash-image-preview",
        ToolType::Reels => "klingai:5@3",
        ToolType::Video => "google:3@1",
        ToolType::Ugc => "bytedance:1@1",
        ToolType::Ads => "google/gemini-2.5-flash",
        ToolType::Product => "google/gemini-2.5-flash",
        ToolType::Seo => "google/gemini-2.5-flash-lite",
        ToolType::Analysis => "google/gemini-2.5-pro",
    }
}

pub fn models_for_tool(tool: ToolType) -> Vec<&'static AiModel> {
    catalog().models_for_tool(Some(tool))
}

/// Like [`models_for_tool`] but takes the raw tag. Unknown tags get the
/// text-tool list.
pub fn models_for_tool_name(name: &str) -> Vec<&'static AiModel> {
    catalog().models_for_tool(name.parse().ok())
}

fn category_allowed(tool: Option<ToolType>, category: ModelCategory) -> bool {
    match tool {
        Some(ToolType::Image) => category == ModelCategory::Image,
        Some(ToolType::Reels | ToolType::Video) => {
            matches!(category, ModelCategory::Video | ModelCategory::Image)
        }
        Some(ToolType::Ugc) => matches!(category, ModelCategory::Image | ModelCategory::Ugc),
        _ => !category.is_media(),
    }
}
