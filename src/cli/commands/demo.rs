//! Demonstration driver: calls each RPC once against a running server.

use std::time::Duration;

use console::style;
use rand::Rng;

use routeguide::client::RouteGuideClient;
use routeguide::models::{Point, Rectangle, RouteNote};

/// A location known to hold a feature in the default dataset.
const KNOWN_FEATURE: Point = Point::new(409146138, -746188906);

/// Run all four RPCs, stopping at the first failure.
pub async fn cmd_demo(server: &str, pause_ms: u64) -> anyhow::Result<()> {
    let client = RouteGuideClient::new(server);

    // GetFeature: one known point, one empty point.
    for point in [KNOWN_FEATURE, Point::new(0, 0)] {
        println!("{} GetFeature {}", style("→").cyan(), point);
        let feature = client.get_feature(point).await?;
        if feature.is_named() {
            println!("  {} {}", style("✓").green(), feature.name);
        } else {
            println!("  {} no feature at {}", style("·").dim(), feature.location);
        }
    }

    // ListFeatures over the area covered by the default dataset.
    let rect = Rectangle::new(
        Point::new(400000000, -750000000),
        Point::new(420000000, -730000000),
    );
    println!("{} ListFeatures within {} / {}", style("→").cyan(), rect.lo, rect.hi);
    let features = client.list_features(rect).await?;
    for feature in &features {
        println!("  {} {:?}", feature.location, feature.name);
    }
    println!("  {} {} features", style("✓").green(), features.len());

    // RecordRoute: the known feature plus random points.
    let points = random_route(&mut rand::thread_rng());
    println!("{} RecordRoute traversing {} points", style("→").cyan(), points.len());
    let summary = client
        .record_route(points, Duration::from_millis(pause_ms))
        .await?;
    println!(
        "  {} {} points, {} features, {} m in {} s",
        style("✓").green(),
        summary.point_count,
        summary.feature_count,
        summary.distance_meters,
        summary.elapsed_seconds
    );

    // RouteChat: each location visited twice so the second visit sees history.
    println!("{} RouteChat", style("→").cyan());
    let received = client.route_chat(chat_notes()).await?;
    for note in &received {
        println!("  {} at point {}", note.message, note.location);
    }
    println!("  {} {} notes received", style("✓").green(), received.len());

    Ok(())
}

/// Random whole-degree point.
fn random_point<R: Rng>(rng: &mut R) -> Point {
    let latitude = (rng.gen_range(0..180) - 90) * 10_000_000;
    let longitude = (rng.gen_range(0..360) - 180) * 10_000_000;
    Point::new(latitude, longitude)
}

/// Known feature followed by 1 to 100 random points.
fn random_route<R: Rng>(rng: &mut R) -> Vec<Point> {
    let count = rng.gen_range(2..=101);
    let mut points = Vec::with_capacity(count);
    points.push(KNOWN_FEATURE);
    points.extend((1..count).map(|_| random_point(rng)));
    points
}

fn chat_notes() -> Vec<RouteNote> {
    vec![
        RouteNote::new(Point::new(0, 1), "First message"),
        RouteNote::new(Point::new(0, 2), "Second message"),
        RouteNote::new(Point::new(0, 3), "Third message"),
        RouteNote::new(Point::new(0, 1), "Fourth message"),
        RouteNote::new(Point::new(0, 2), "Fifth message"),
        RouteNote::new(Point::new(0, 3), "Sixth message"),
    ]
}
