use axum::{Json, extract::Query};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::catalog::{self, ToolType};

#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    pub tool: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Models offered for `?tool=`, or the whole catalog without it.
pub async fn list_models(Query(query): Query<ModelsQuery>) -> Json<Value> {
    match query.tool.as_deref() {
        Some(tool) => {
            let recommended = tool.parse::<ToolType>().ok().map(catalog::recommended_model);
            Json(json!({
                "tool": tool,
                "recommended": recommended,
                "models": catalog::models_for_tool_name(tool),
            }))
        }
        None => Json(json!({
            "recommended": Value::Null,
            "models": catalog::catalog().models,
        })),
    }
}
