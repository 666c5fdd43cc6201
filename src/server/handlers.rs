//! RPC endpoint handlers.
//!
//! Each handler adapts the HTTP or WebSocket framing to the streams and
//! sinks expected by [`RouteGuideService`].

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures::channel::mpsc;
use futures::{future, SinkExt, StreamExt, TryStreamExt};

use super::AppState;
use crate::error::RpcError;
use crate::models::{Feature, Point, Rectangle, RouteNote, RouteSummary};
use crate::service::RouteGuideService;
use crate::wire::{decode_lines, encode_line, NDJSON_CONTENT_TYPE};

/// Features buffered between the scan and the response body.
const LIST_FEATURES_BUFFER: usize = 16;

/// Health check reporting loaded features and active note locations.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "features": state.service.features().len(),
        "note_locations": state.service.notes().location_count(),
    }))
}

/// GetFeature: unnamed feature when nothing is known at the point.
pub async fn get_feature(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Feature>, RpcError> {
    let point: Point = serde_json::from_slice(&body)?;
    tracing::debug!("GetFeature {}", point);
    Ok(Json(state.service.get_feature(point)))
}

/// ListFeatures: streams matching features as NDJSON.
///
/// The scan runs in its own task feeding a bounded channel; a client that
/// disconnects closes the channel and aborts the scan.
pub async fn list_features(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, RpcError> {
    let rect: Rectangle = serde_json::from_slice(&body)?;
    tracing::debug!("ListFeatures within {} / {}", rect.lo, rect.hi);

    let (tx, rx) = mpsc::channel::<Feature>(LIST_FEATURES_BUFFER);
    let service = Arc::clone(&state.service);
    tokio::spawn(async move {
        let sink = tx.sink_map_err(RpcError::outbound);
        if let Err(e) = service.list_features(rect, sink).await {
            tracing::warn!("ListFeatures aborted: {}", e);
        }
    });

    let body = Body::from_stream(rx.map(|feature| encode_line(&feature)));
    Ok(([(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)], body).into_response())
}

/// RecordRoute: NDJSON points in, summary out once the body ends.
pub async fn record_route(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<RouteSummary>, RpcError> {
    let points = decode_lines::<Point, _, _, _>(body.into_data_stream());

    match state.service.record_route(points).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::warn!("RecordRoute aborted: {}", e);
            Err(e)
        }
    }
}

/// RouteChat: upgrade to a WebSocket and exchange notes.
pub async fn route_chat(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| chat_session(state.service, socket))
}

async fn chat_session(service: Arc<RouteGuideService>, socket: WebSocket) {
    let (sender, receiver) = socket.split();

    // A Close frame from the client is the end of its stream.
    let inbound = receiver
        .map_err(RpcError::inbound)
        .try_take_while(|msg| future::ready(Ok(!matches!(msg, Message::Close(_)))))
        .try_filter_map(|msg| future::ready(decode_message(msg)));

    let outbound = sender
        .sink_map_err(RpcError::outbound)
        .with(|note: RouteNote| future::ready(encode_message(&note)));

    match service.route_chat(inbound, outbound).await {
        Ok(()) => tracing::debug!("RouteChat finished"),
        Err(e) => tracing::warn!("RouteChat aborted: {}", e),
    }
}

fn decode_message(msg: Message) -> Result<Option<RouteNote>, RpcError> {
    match msg {
        Message::Text(text) => Ok(Some(serde_json::from_str(&text)?)),
        Message::Binary(data) => Ok(Some(serde_json::from_slice(&data)?)),
        // Ping/pong is handled by the socket itself.
        _ => Ok(None),
    }
}

fn encode_message(note: &RouteNote) -> Result<Message, RpcError> {
    Ok(Message::Text(serde_json::to_string(note)?))
}
