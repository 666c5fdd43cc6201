//! HTTP/WebSocket transport for the route guide service.
//!
//! - `POST /rpc/get_feature`: JSON point in, JSON feature out
//! - `POST /rpc/list_features`: JSON rectangle in, NDJSON features out
//! - `POST /rpc/record_route`: NDJSON points in, JSON summary out
//! - `GET /rpc/route_chat`: WebSocket, one JSON note per text frame each way

mod handlers;
mod routes;

pub use routes::create_router;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::error::RpcError;
use crate::service::RouteGuideService;
use crate::store::FeatureStore;

/// Shared state for the server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RouteGuideService>,
}

impl AppState {
    pub fn new(store: FeatureStore) -> Self {
        Self {
            service: Arc::new(RouteGuideService::new(Arc::new(store))),
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = match self {
            RpcError::Decode(_) | RpcError::LineTooLong(_) | RpcError::Inbound(_) => {
                StatusCode::BAD_REQUEST
            }
            RpcError::Outbound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Load the feature dataset and serve until the process is stopped.
///
/// A dataset that fails to load aborts startup before the listener is bound.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let store = FeatureStore::load(&settings.features_path).await?;
    let state = AppState::new(store);

    let listener = TcpListener::bind(settings.bind.as_str()).await?;
    tracing::info!("Starting route guide server at http://{}", listener.local_addr()?);

    serve_listener(listener, state).await?;
    Ok(())
}

/// Serve on an already bound listener.
pub async fn serve_listener(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, create_router(state)).await
}
