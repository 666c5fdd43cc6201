//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use routeguide::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "routeguide")]
#[command(about = "Location-based feature service")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "ROUTEGUIDE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the route guide server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3000)
        #[arg(env = "ROUTEGUIDE_BIND")]
        bind: Option<String>,
        /// Feature dataset to load at startup
        #[arg(short, long, env = "ROUTEGUIDE_FEATURES")]
        features: Option<PathBuf>,
    },

    /// Exercise all four RPCs against a running server
    Demo {
        /// Server URL
        #[arg(short, long, default_value = "http://127.0.0.1:3000")]
        server: String,
        /// Delay between RecordRoute points in milliseconds
        #[arg(long, default_value = "100")]
        pause_ms: u64,
    },

    /// Print the dataset features inside a rectangle (all by default)
    Features {
        /// Feature dataset to read
        #[arg(short, long, env = "ROUTEGUIDE_FEATURES")]
        features: Option<PathBuf>,
        /// First corner as LATITUDE,LONGITUDE in 1e-7 degrees
        #[arg(long, requires = "hi", allow_hyphen_values = true)]
        lo: Option<String>,
        /// Opposite corner as LATITUDE,LONGITUDE in 1e-7 degrees
        #[arg(long, requires = "lo", allow_hyphen_values = true)]
        hi: Option<String>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, features } => {
            let settings = load_settings_with_options(LoadOptions {
                config_path: cli.config,
                bind,
                features_path: features,
            })
            .await?;
            commands::cmd_serve(&settings).await
        }
        Commands::Demo { server, pause_ms } => commands::cmd_demo(&server, pause_ms).await,
        Commands::Features { features, lo, hi } => {
            let settings = load_settings_with_options(LoadOptions {
                config_path: cli.config,
                features_path: features,
                ..Default::default()
            })
            .await?;
            commands::cmd_features(&settings, lo.as_deref(), hi.as_deref()).await
        }
    }
}
