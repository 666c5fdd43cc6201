//! End-to-end tests: a real server on an ephemeral port driven by the client.

use std::path::Path;
use std::time::Duration;

use tokio::net::TcpListener;

use routeguide::client::{ClientError, RouteGuideClient};
use routeguide::geo::distance_meters;
use routeguide::models::{Feature, Point, Rectangle, RouteNote, RouteSummary};
use routeguide::server::{serve_listener, AppState};
use routeguide::store::FeatureStore;

const DATASET: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/route_guide_db.json");

async fn start_server() -> (RouteGuideClient, FeatureStore) {
    let store = FeatureStore::load(Path::new(DATASET)).await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(serve_listener(listener, AppState::new(store.clone())));

    (RouteGuideClient::new(format!("http://{}", addr)), store)
}

#[tokio::test]
async fn test_default_dataset_loads() {
    let store = FeatureStore::load(Path::new(DATASET)).await.unwrap();
    assert_eq!(store.len(), 20);
    assert!(store.features().iter().any(|f| !f.is_named()));
}

#[tokio::test]
async fn test_get_feature() {
    let (client, store) = start_server().await;

    let known = store.features()[0].clone();
    assert_eq!(client.get_feature(known.location).await.unwrap(), known);

    let missing = client.get_feature(Point::new(0, 0)).await.unwrap();
    assert_eq!(missing, Feature::unnamed(Point::new(0, 0)));
}

#[tokio::test]
async fn test_list_features_everywhere_in_load_order() {
    let (client, store) = start_server().await;

    let features = client.list_features(Rectangle::everywhere()).await.unwrap();
    assert_eq!(features, store.features());
}

#[tokio::test]
async fn test_list_features_region() {
    let (client, store) = start_server().await;
    let rect = Rectangle::new(
        Point::new(420000000, -730000000),
        Point::new(400000000, -750000000),
    );

    let features = client.list_features(rect).await.unwrap();
    let expected: Vec<_> = store.find_in_region(&rect).cloned().collect();
    assert_eq!(features, expected);

    let empty = client
        .list_features(Rectangle::new(Point::new(0, 0), Point::new(1, 1)))
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_record_route() {
    let (client, store) = start_server().await;
    let a = store.features()[0].location;
    let b = Point::new(0, 0);

    let summary = client
        .record_route(vec![a, b], Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.point_count, 2);
    assert_eq!(summary.feature_count, 1);
    assert_eq!(summary.distance_meters, u64::from(distance_meters(&a, &b)));

    let empty = client.record_route(Vec::new(), Duration::ZERO).await.unwrap();
    assert_eq!(empty, RouteSummary::default());
}

#[tokio::test]
async fn test_route_chat_history() {
    let (client, _store) = start_server().await;
    let here = Point::new(0, 1);
    let n1 = RouteNote::new(here, "I was here!");
    let n2 = RouteNote::new(here, "Ummm...");
    let n3 = RouteNote::new(here, "Later visitor");

    let first = client
        .route_chat(vec![n1.clone(), n2.clone()])
        .await
        .unwrap();
    assert_eq!(first, vec![n1.clone(), n1.clone(), n2.clone()]);

    // A later caller sees the earlier notes before its own.
    let second = client.route_chat(vec![n3.clone()]).await.unwrap();
    assert_eq!(second, vec![n1, n2, n3]);
}

/// Split one caller's replies into the history snapshot sent for each of its
/// notes, and check that every snapshot extends the one before it.
fn assert_growing_snapshots(sent: &[String], received: &[RouteNote]) {
    let mut snapshots: Vec<&[RouteNote]> = Vec::new();
    let mut start = 0;
    for message in sent {
        let end = start
            + received[start..]
                .iter()
                .position(|note| &note.message == message)
                .expect("a reply ending with every sent note")
            + 1;
        snapshots.push(&received[start..end]);
        start = end;
    }
    assert_eq!(start, received.len());

    for pair in snapshots.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        assert!(later.len() > earlier.len());
        assert_eq!(&later[..earlier.len()], earlier);
    }
}

#[tokio::test]
async fn test_route_chat_concurrent_callers() {
    let (client, _store) = start_server().await;
    let here = Point::new(5, 5);

    let calls: Vec<_> = (0..4)
        .map(|caller| {
            let client = client.clone();
            tokio::spawn(async move {
                let sent: Vec<String> = (0..10).map(|i| format!("{caller}:{i}")).collect();
                let notes = sent.iter().map(|m| RouteNote::new(here, m.as_str())).collect();
                (sent, client.route_chat(notes).await)
            })
        })
        .collect();

    let mut all_sent = Vec::new();
    for call in calls {
        let (sent, received) = call.await.unwrap();
        assert_growing_snapshots(&sent, &received.unwrap());
        all_sent.push(sent);
    }

    let after = client
        .route_chat(vec![RouteNote::new(here, "last")])
        .await
        .unwrap();
    assert_eq!(after.len(), 41);
    assert_eq!(after.last().unwrap().message, "last");

    // Each caller's notes are stored in the order it sent them.
    for sent in all_sent {
        let stored: Vec<&String> = after
            .iter()
            .map(|note| &note.message)
            .filter(|m| sent.contains(*m))
            .collect();
        assert_eq!(stored, sent.iter().collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_record_route_rejects_malformed_body() {
    let (client, _store) = start_server().await;

    let response = reqwest::Client::new()
        .post(format!("{}/rpc/record_route", client.base_url()))
        .body("not json\n")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreachable_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RouteGuideClient::with_timeout(format!("http://{}", addr), Duration::from_secs(2));
    let err = client.get_feature(Point::new(0, 0)).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}
