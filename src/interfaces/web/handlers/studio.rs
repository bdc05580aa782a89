use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;

use super::super::AppState;
use super::super::auth::Caller;
use super::super::error::ApiError;
use crate::core::backend::UsageRecord;
use crate::core::backend::usage::record_best_effort;
use crate::core::catalog::{DEFAULT_CHAT_MODEL, ToolType, recommended_model};
use crate::core::prompts::photo::PhotoBrief;
use crate::core::studio::advisor::{AdvisorRequest, AdvisorResponse};
use crate::core::studio::generate::{GenerateRequest, GenerateResponse};
use crate::core::studio::image::{ImageGenRequest, ImageGenResponse};
use crate::core::studio::product::{AnalyzeProductRequest, AnalyzeProductResponse};
use crate::core::studio::reel::{ReelRequest, ReelResponse};
use crate::core::studio::ugc::{UgcRequest, UgcResponse, resolve_video_model};

type Payload<T> = Result<Json<T>, JsonRejection>;

impl AppState {
    /// Usage is only recorded for authenticated callers.
    async fn record_usage(&self, caller: &Caller, tool_type: &str, model: &str) {
        if let Some(user) = &caller.0 {
            record_best_effort(
                self.usage.as_ref(),
                UsageRecord::new(&user.id, tool_type, model),
            )
            .await;
        }
    }
}

pub async fn ai_generate(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Payload<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.studio.ai_generate(&request).await?;
    state
        .record_usage(&caller, request.tool_type.trim(), &response.model)
        .await;
    Ok(Json(response))
}

pub async fn analyze_product(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Payload<AnalyzeProductRequest>,
) -> Result<Json<AnalyzeProductResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.studio.analyze_product(&request).await?;
    state
        .record_usage(
            &caller,
            "analyze-product",
            recommended_model(ToolType::Analysis),
        )
        .await;
    Ok(Json(response))
}

pub async fn generate_image(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Payload<ImageGenRequest>,
) -> Result<Json<ImageGenResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.studio.generate_image(&request).await?;
    state
        .record_usage(&caller, "image", recommended_model(ToolType::Image))
        .await;
    Ok(Json(response))
}

pub async fn generate_reel(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Payload<ReelRequest>,
) -> Result<Json<ReelResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.studio.generate_reel(&request).await?;
    let model = state.studio.settings().reel_model.clone();
    state.record_usage(&caller, "reels", &model).await;
    Ok(Json(response))
}

pub async fn generate_ugc(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Payload<UgcRequest>,
) -> Result<Json<UgcResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.studio.generate_ugc(&request).await?;
    state
        .record_usage(&caller, "ugc", resolve_video_model(request.model.as_deref()))
        .await;
    Ok(Json(response))
}

pub async fn business_advisor(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Payload<AdvisorRequest>,
) -> Result<Json<AdvisorResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.studio.business_advisor(&request).await?;
    state
        .record_usage(
            &caller,
            "business-advisor",
            recommended_model(ToolType::Analysis),
        )
        .await;
    Ok(Json(response))
}

pub async fn product_photo_prompt(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Payload<PhotoBrief>,
) -> Result<Json<Value>, ApiError> {
    let Json(brief) = payload?;
    let response = state.studio.product_photo_prompt(&brief).await?;
    state
        .record_usage(&caller, "product-photo-prompt", DEFAULT_CHAT_MODEL)
        .await;
    Ok(Json(response))
}
