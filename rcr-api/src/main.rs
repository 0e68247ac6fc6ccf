//! rcr-api - Rod Catch Returns REST service
//!
//! Records rod-and-line catch returns (submissions, activities, catches)
//! and serves the grilse-probability reference data pipeline.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use rcr_api::{build_router, AppState};
use rcr_common::config::{load_toml_config, resolve_config, TomlConfig};
use rcr_common::db::init_database;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "rcr-api", about = "Rod Catch Returns REST service")]
struct Args {
    /// Listen port (overrides RCR_PORT and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Database file path (overrides RCR_DATABASE and the config file)
    #[arg(long)]
    database: Option<PathBuf>,

    /// TOML config file path
    #[arg(long, default_value = "rcr.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Rod Catch Returns API (rcr-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let toml_config: TomlConfig = load_toml_config(&args.config)?;
    let config = resolve_config(args.port, args.database, &toml_config);

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Database ready: {}", config.database_path.display());
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    // Create application state and router
    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("rcr-api listening on http://{}", config.bind_address());
    info!("Health check: http://{}/health", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
