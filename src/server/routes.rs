//! Router configuration for the route guide server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the router exposing the four RPCs and a health check.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Single request, single response
        .route("/rpc/get_feature", post(handlers::get_feature))
        // Single request, streamed response
        .route("/rpc/list_features", post(handlers::list_features))
        // Streamed request, single response
        .route("/rpc/record_route", post(handlers::record_route))
        // Streamed both ways
        .route("/rpc/route_chat", get(handlers::route_chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
