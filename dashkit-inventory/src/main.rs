//! dashkit-inventory - Inventory Management Dashboard service
//!
//! Serves the dashboard and its JSON API on port 5801 by default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dashkit_common::config::{load_module_config, CliOverrides, ConfigSource, ServiceSettings};
use dashkit_common::logging::init_tracing;
use dashkit_common::shutdown::shutdown_signal;
use tracing::{info, warn};

use dashkit_inventory::sample::DEFAULT_SAMPLE_SIZE;
use dashkit_inventory::{AppState, CONFIG_MODULE, DEFAULT_PORT, MODULE_NAME};

/// Command-line arguments for dashkit-inventory
#[derive(Parser, Debug)]
#[command(name = "dashkit-inventory")]
#[command(about = "Inventory Management Dashboard: products, stock levels and low-stock alerts")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "DASHKIT_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "DASHKIT_INVENTORY_PORT")]
    port: Option<u16>,

    /// TOML config file (defaults to <config dir>/dashkit/inventory.toml)
    #[arg(short, long, env = "DASHKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level or filter directive, overridden by RUST_LOG
    #[arg(long, env = "DASHKIT_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_module_config(args.config.as_deref(), CONFIG_MODULE)
        .context("Failed to load configuration")?;

    let cli = CliOverrides {
        host: args.host,
        port: args.port,
        log_level: args.log_level,
    };
    let settings = ServiceSettings::resolve(&cli, &loaded.config, DEFAULT_PORT);

    init_tracing(&settings.log_level).context("Failed to initialize logging")?;

    info!("Starting {} (Inventory Dashboard)", MODULE_NAME);
    info!("{}", dashkit_inventory::build_info().banner());
    match &loaded.source {
        ConfigSource::File(path) => info!("Config: {}", path.display()),
        ConfigSource::Defaults { reason } => warn!("Config: using defaults ({})", reason),
    }

    let sample_size = loaded.config.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE);
    info!(
        "Session idle timeout: {}s, sample size: {}",
        settings.session_idle.as_secs(),
        sample_size
    );

    let state = AppState::new(settings.session_idle, sample_size);
    let app = dashkit_inventory::build_router(state);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
