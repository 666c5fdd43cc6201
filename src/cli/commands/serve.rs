//! Server command.

use console::style;

use routeguide::config::Settings;

/// Start the route guide server.
pub async fn cmd_serve(settings: &Settings) -> anyhow::Result<()> {
    println!(
        "{} Loading features from {}",
        style("→").cyan(),
        settings.features_path.display()
    );

    println!(
        "{} Starting route guide server at http://{}",
        style("→").cyan(),
        settings.bind
    );
    println!("  Press Ctrl+C to stop");

    if let Err(e) = routeguide::server::serve(settings).await {
        eprintln!("  {} Server failed: {}", style("✗").red(), e);
        return Err(e);
    }
    Ok(())
}
