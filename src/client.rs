//! Client for a running route guide server.
//!
//! Used by the `demo` command to exercise all four RPCs.

use std::time::Duration;

use futures::{stream, SinkExt, StreamExt, TryStreamExt};
use thiserror::Error;
use tokio_tungstenite::tungstenite::Message;

use crate::error::RpcError;
use crate::models::{Feature, Point, Rectangle, RouteNote, RouteSummary};
use crate::wire::{decode_lines, encode_line, NDJSON_CONTENT_TYPE};

/// Errors that can occur while calling the server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket failed: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Call timed out after {0:?}")]
    Timeout(Duration),
}

/// Route guide client over HTTP and WebSocket.
#[derive(Debug, Clone)]
pub struct RouteGuideClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RouteGuideClient {
    /// Create a client for a server at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// Create a client whose calls give up after `timeout`.
    ///
    /// For RouteChat the limit covers the whole exchange, handshake included.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn ws_url(&self, path: &str) -> Result<String, ClientError> {
        let url = if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else {
            return Err(ClientError::InvalidUrl(self.base_url.clone()));
        };
        Ok(format!("{}{}", url, path))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Status { status, body })
        }
    }

    /// GetFeature.
    pub async fn get_feature(&self, point: Point) -> Result<Feature, ClientError> {
        let response = self
            .http
            .post(self.url("/rpc/get_feature"))
            .json(&point)
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    /// ListFeatures, collected in arrival order.
    pub async fn list_features(&self, rect: Rectangle) -> Result<Vec<Feature>, ClientError> {
        let response = self
            .http
            .post(self.url("/rpc/list_features"))
            .json(&rect)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let features: Vec<Feature> = decode_lines::<Feature, _, _, _>(response.bytes_stream())
            .try_collect()
            .await?;
        Ok(features)
    }

    /// RecordRoute, sending `points` as a streamed body with `pause` between them.
    pub async fn record_route(
        &self,
        points: Vec<Point>,
        pause: Duration,
    ) -> Result<RouteSummary, ClientError> {
        let body = stream::iter(points.into_iter().enumerate()).then(move |(i, point)| async move {
            if i > 0 && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            encode_line(&point)
        });

        let response = self
            .http
            .post(self.url("/rpc/record_route"))
            .header(reqwest::header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)
            .body(reqwest::Body::wrap_stream(body))
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    /// RouteChat: send every note, then return everything the server replied.
    ///
    /// Replies are read concurrently with sending; the call ends when the
    /// server closes its side after our close.
    pub async fn route_chat(&self, notes: Vec<RouteNote>) -> Result<Vec<RouteNote>, ClientError> {
        let url = self.ws_url("/rpc/route_chat")?;
        match tokio::time::timeout(self.timeout, Self::chat_exchange(url, notes)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(self.timeout)),
        }
    }

    async fn chat_exchange(
        url: String,
        notes: Vec<RouteNote>,
    ) -> Result<Vec<RouteNote>, ClientError> {
        let (socket, _) = tokio_tungstenite::connect_async(url).await?;
        let (mut sender, mut receiver) = socket.split();

        // Both halves run in this task, so an error on either drops the other.
        let send = async move {
            for note in &notes {
                let text = serde_json::to_string(note).map_err(RpcError::from)?;
                sender.send(Message::Text(text)).await?;
            }
            sender.close().await?;
            Ok::<_, ClientError>(())
        };

        let receive = async move {
            let mut received = Vec::new();
            while let Some(msg) = receiver.next().await {
                match msg? {
                    Message::Text(text) => {
                        let note: RouteNote = serde_json::from_str(&text).map_err(RpcError::from)?;
                        tracing::debug!("{} at point {}", note.message, note.location);
                        received.push(note);
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Ok::<_, ClientError>(received)
        };

        let ((), received) = tokio::try_join!(send, receive)?;
        Ok(received)
    }
}
