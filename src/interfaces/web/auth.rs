use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AppState;
use super::error::ApiError;
use crate::core::backend::{AuthUser, bearer_token};

/// Who made the request. `None` when auth is disabled.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<AuthUser>);

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Auth disabled for local development
    let Some(verifier) = state.auth.clone() else {
        req.extensions_mut().insert(Caller(None));
        return next.run(req).await;
    };

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = match bearer_token(header) {
        Ok(token) => token.to_string(),
        Err(e) => return ApiError::from(e).into_response(),
    };

    match verifier.verify(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(Caller(Some(user)));
            next.run(req).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
