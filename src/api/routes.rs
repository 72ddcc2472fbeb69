//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::docs::ApiDoc;
use super::handlers::{self, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Static endpoints
        .route("/api/saludo", get(handlers::saludo))
        .route("/api/health", get(handlers::health))
        // Electoral endpoints
        .route("/api/emol/:distrito", get(handlers::emol))
        .route("/api/dhondt/:distrito", get(handlers::dhondt))
        .route("/api/dhondt", post(handlers::dhondt_post))
        .route("/api/resumen", get(handlers::resumen))
        .route("/api/encuestas", get(handlers::encuestas))
        .route("/api/resultado/:distrito", get(handlers::resultado))
        .route("/api/distritos", get(handlers::distritos))
        .route("/api/candidatos", get(handlers::candidatos))
        // CORS: any origin may consume the API
        .layer(CorsLayer::permissive())
        .with_state(state)
}
