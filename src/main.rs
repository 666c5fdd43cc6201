//! Route guide - location-based feature service.
//!
//! Serves the route guide RPCs and provides a demonstration driver.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ROUTEGUIDE_* settings may come from a local .env.
    let _ = dotenvy::dotenv();

    // RUST_LOG wins over -v.
    let default_filter = if cli::is_verbose() {
        "routeguide=debug"
    } else {
        "routeguide=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
