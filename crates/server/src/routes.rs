use axum::{
    routing::{delete, get, put},
    Json, Router,
};
use service::services::extension_service::ExtensionService;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod extensions;

/// Shared handler state. Holds no document copy; the service re-reads per request.
#[derive(Clone)]
pub struct ServerState {
    pub extensions: ExtensionService,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: health, blocklist API and OpenAPI document.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let api = Router::new()
        .route("/api/fixed-extensions", get(extensions::list_fixed))
        .route("/api/fixed-extensions/:extension", put(extensions::toggle_fixed))
        .route(
            "/api/custom-extensions",
            get(extensions::list_custom).post(extensions::add_custom),
        )
        .route("/api/custom-extensions/:extension", delete(extensions::delete_custom))
        .route("/api/blocked-extensions", get(extensions::list_blocked));

    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR));

    public
        .merge(api)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
}
