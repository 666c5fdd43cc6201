//! Dataset inspection command.

use anyhow::Context;
use console::style;

use routeguide::config::Settings;
use routeguide::models::{Point, Rectangle};
use routeguide::store::FeatureStore;

/// Print the features of the configured dataset inside a rectangle.
pub async fn cmd_features(
    settings: &Settings,
    lo: Option<&str>,
    hi: Option<&str>,
) -> anyhow::Result<()> {
    let rect = match (lo, hi) {
        (Some(lo), Some(hi)) => Rectangle::new(parse_point(lo)?, parse_point(hi)?),
        _ => Rectangle::everywhere(),
    };

    let store = FeatureStore::load(&settings.features_path).await?;

    let mut shown = 0;
    for feature in store.find_in_region(&rect) {
        let name = if feature.is_named() {
            style(feature.name.as_str()).bold()
        } else {
            style("(unnamed)").dim()
        };
        println!("{} {}", feature.location, name);
        shown += 1;
    }

    println!(
        "\n{} {} of {} features",
        style("✓").green(),
        shown,
        store.len()
    );
    Ok(())
}

/// Parse `LATITUDE,LONGITUDE` in fixed-point units.
fn parse_point(s: &str) -> anyhow::Result<Point> {
    let (lat, lng) = s
        .split_once(',')
        .with_context(|| format!("expected LATITUDE,LONGITUDE, got {:?}", s))?;
    let latitude = lat
        .trim()
        .parse()
        .with_context(|| format!("invalid latitude {:?}", lat))?;
    let longitude = lng
        .trim()
        .parse()
        .with_context(|| format!("invalid longitude {:?}", lng))?;
    Ok(Point::new(latitude, longitude))
}
