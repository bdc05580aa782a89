//! Prompt templates for every studio tool.
//!
//! Each builder returns a [`PromptPair`]: a system prompt that fixes the role,
//! the output language and the JSON shape the model must return, and a user
//! prompt carrying the seller's fields. Missing optional fields are left out
//! rather than rendered empty.

pub mod advisor;
pub mod media;
pub mod photo;
pub mod product;
pub mod tools;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::core::llm::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Arabic,
    #[default]
    English,
}

impl Language {
    /// `ar` (any case, optionally with a region such as `ar-SA`) is Arabic;
    /// everything else is English.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_lowercase();
        if code == "ar" || code.starts_with("ar-") || code == "arabic" {
            Language::Arabic
        } else {
            Language::English
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Language::Arabic => {
                "Respond in Arabic (Modern Standard Arabic, natural for Gulf and Egyptian shoppers). Keep JSON keys in English."
            }
            Language::English => "Respond in English.",
        }
    }

    pub fn is_arabic(&self) -> bool {
        *self == Language::Arabic
    }

    /// Picks the string for this language.
    pub fn pick<'a>(&self, arabic: &'a str, english: &'a str) -> &'a str {
        if self.is_arabic() { arabic } else { english }
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Language::from_code(&code))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(self.user.clone()),
        ]
    }

    /// Same as [`PromptPair::messages`] with the image attached to the user turn.
    pub fn messages_with_image(&self, image_url: Option<&str>) -> Vec<ChatMessage> {
        match image_url {
            Some(url) => vec![
                ChatMessage::system(self.system.clone()),
                ChatMessage::user_with_image(self.user.clone(), url),
            ],
            None => self.messages(),
        }
    }
}

/// System prompt with the standard language line and JSON contract appended.
pub(crate) fn json_system(role: &str, lang: Language, shape: &str) -> String {
    format!(
        "{role}\n\n{}\n\nReturn ONLY valid JSON, with no markdown and no commentary, in exactly this shape:\n{shape}",
        lang.instruction()
    )
}

/// Reads a free-form input field as display text. Strings are trimmed,
/// numbers and booleans are stringified and string arrays are comma-joined.
pub(crate) fn field(input: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match input.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Accumulates `Label: value` lines, skipping absent values.
#[derive(Default)]
pub(crate) struct Brief {
    lines: Vec<String>,
}

impl Brief {
    pub fn line(mut self, label: &str, value: Option<impl AsRef<str>>) -> Self {
        if let Some(v) = value {
            let v = v.as_ref().trim();
            if !v.is_empty() {
                self.lines.push(format!("{}: {}", label, v));
            }
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}
