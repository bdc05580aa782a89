use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, Request, header},
    middleware,
    middleware::Next,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::auth;
use super::handlers::{catalog, studio};

/// Product photos arrive inline as data URIs.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

pub fn build_api_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(catalog::health))
        .route("/api/models", get(catalog::list_models));

    let authed_routes = Router::new()
        .route("/api/ai-generate", post(studio::ai_generate))
        .route("/api/analyze-product", post(studio::analyze_product))
        .route("/api/generate-image", post(studio::generate_image))
        .route("/api/generate-reel", post(studio::generate_reel))
        .route("/api/generate-ugc", post(studio::generate_ugc))
        .route("/api/business-advisor", post(studio::business_advisor))
        .route("/api/product-photo-prompt", post(studio::product_photo_prompt))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    public_routes
        .merge(authed_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors())
        .with_state(state)
}

async fn security_headers(req: Request<Body>, next: Next) -> axum::response::Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    response
}
