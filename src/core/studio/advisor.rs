use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{Studio, StudioError};
use crate::core::catalog::{ToolType, recommended_model};
use crate::core::prompts::Language;
use crate::core::prompts::advisor::{AnalysisType, advisor_prompt};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorRequest {
    pub analysis_type: String,
    /// Campaign metrics or ad copy, as free-form JSON or text.
    #[serde(default)]
    pub context: Value,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisorResponse {
    pub result: Value,
}

impl Studio {
    pub async fn business_advisor(
        &self,
        request: &AdvisorRequest,
    ) -> Result<AdvisorResponse, StudioError> {
        let kind: AnalysisType = request
            .analysis_type
            .parse()
            .map_err(StudioError::Validation)?;
        let model = recommended_model(ToolType::Analysis);
        info!("business-advisor: {} with {}", kind.as_str(), model);

        let prompt = advisor_prompt(kind, &request.context, request.language);
        let result = self.complete_json(model, prompt.messages()).await?;
        Ok(AdvisorResponse { result })
    }
}
