//! API route configuration

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};

use super::handlers::{self, AppState};
use crate::config::ServerConfig;

/// Build the complete router: JSON API, health check and static page
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/api/prompt", post(handlers::prompt))
        .route("/api/ask", post(handlers::ask))
        .route("/api/explain", post(handlers::explain))
        .route("/api/store", post(handlers::store))
        .route("/api/search", post(handlers::search))
        .route("/api/usage", get(handlers::usage))
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .fallback_service(ServeDir::new(&server.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(server.max_body_size_mb * 1024 * 1024)),
        )
}
