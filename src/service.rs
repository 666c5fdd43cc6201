//! The four route guide RPC handlers.
//!
//! Handlers are transport-agnostic: streamed requests arrive as a
//! [`Stream`] of decoded messages, streamed responses leave through a
//! [`Sink`]. A failure on either side aborts the call and is returned to
//! the transport as-is.

use std::sync::Arc;

use futures::{pin_mut, Sink, SinkExt, Stream, StreamExt};
use tokio::time::Instant;

use crate::error::RpcError;
use crate::geo::distance_meters;
use crate::models::{Feature, Point, Rectangle, RouteNote, RouteSummary};
use crate::store::{FeatureStore, NoteRegistry};

/// Route guide service state shared by every call.
#[derive(Debug)]
pub struct RouteGuideService {
    features: Arc<FeatureStore>,
    notes: NoteRegistry,
}

impl RouteGuideService {
    pub fn new(features: Arc<FeatureStore>) -> Self {
        Self {
            features,
            notes: NoteRegistry::new(),
        }
    }

    pub fn features(&self) -> &FeatureStore {
        &self.features
    }

    pub fn notes(&self) -> &NoteRegistry {
        &self.notes
    }

    /// Feature at `point`, or an unnamed feature when none is known there.
    pub fn get_feature(&self, point: Point) -> Feature {
        self.features
            .find_exact(&point)
            .cloned()
            .unwrap_or_else(|| Feature::unnamed(point))
    }

    /// Send every feature inside `rect` to `sink`, in store order, then close it.
    pub async fn list_features<K>(&self, rect: Rectangle, sink: K) -> Result<usize, RpcError>
    where
        K: Sink<Feature, Error = RpcError>,
    {
        pin_mut!(sink);

        let mut sent = 0;
        for feature in self.features.find_in_region(&rect) {
            sink.send(feature.clone()).await?;
            sent += 1;
        }
        sink.close().await?;

        tracing::debug!("ListFeatures sent {} features", sent);
        Ok(sent)
    }

    /// Accumulate statistics over a stream of points.
    ///
    /// Every store feature located exactly at a received point counts, so a
    /// point visited twice is counted twice. Elapsed time runs from the first
    /// received point to end-of-stream.
    pub async fn record_route<S>(&self, points: S) -> Result<RouteSummary, RpcError>
    where
        S: Stream<Item = Result<Point, RpcError>>,
    {
        pin_mut!(points);

        let mut summary = RouteSummary::default();
        let mut previous: Option<Point> = None;
        let mut started: Option<Instant> = None;

        while let Some(point) = points.next().await {
            let point = point?;
            started.get_or_insert_with(Instant::now);

            let leg = previous.map_or(0, |prev| distance_meters(&prev, &point));
            summary.add_point(self.features.count_exact(&point), leg);
            previous = Some(point);
        }

        summary.elapsed_seconds = started.map(|t| t.elapsed().as_secs()).unwrap_or(0);

        tracing::debug!(
            "RecordRoute finished: {} points, {} features, {} m",
            summary.point_count,
            summary.feature_count,
            summary.distance_meters
        );
        Ok(summary)
    }

    /// Store each incoming note and reply with the full history at its location.
    ///
    /// The reply for one note is fully sent before the next note is read.
    /// The outbound sink is closed once the inbound stream ends.
    pub async fn route_chat<S, K>(&self, notes: S, sink: K) -> Result<(), RpcError>
    where
        S: Stream<Item = Result<RouteNote, RpcError>>,
        K: Sink<RouteNote, Error = RpcError>,
    {
        pin_mut!(notes);
        pin_mut!(sink);

        while let Some(note) = notes.next().await {
            let note = note?;
            let history = self.notes.append(note.location, note);
            for previous in history {
                sink.feed(previous).await?;
            }
            sink.flush().await?;
        }

        sink.close().await
    }
}
