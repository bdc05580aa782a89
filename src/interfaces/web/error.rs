use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::core::backend::AuthError;
use crate::core::llm::GatewayError;
use crate::core::studio::StudioError;

/// Every failure leaves the API as `{ "error": <message> }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Unauthorized: {}", msg);
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn rate_limited() -> Self {
        tracing::warn!("Upstream rate limit hit");
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            GatewayError::RateLimited.to_string(),
        )
    }

    pub fn payment_required() -> Self {
        tracing::warn!("Upstream credits exhausted");
        Self::new(
            StatusCode::PAYMENT_REQUIRED,
            GatewayError::PaymentRequired.to_string(),
        )
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<StudioError> for ApiError {
    fn from(err: StudioError) -> Self {
        match err {
            StudioError::Validation(msg) => Self::bad_request(msg),
            StudioError::Gateway(GatewayError::RateLimited) => Self::rate_limited(),
            StudioError::Gateway(GatewayError::PaymentRequired) => Self::payment_required(),
            StudioError::Gateway(GatewayError::Upstream {
                provider,
                status,
                body,
            }) => {
                tracing::warn!("{} answered HTTP {}: {}", provider, status, body);
                Self::internal(format!("{} error (HTTP {})", provider, status))
            }
            StudioError::Parse(e) => {
                tracing::warn!("Model reply was not JSON: {}", e.excerpt);
                Self::internal(e.to_string())
            }
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::unauthorized(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
