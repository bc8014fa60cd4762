mod server;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use bookstore_core::{
    bootstrap::{init_services, load_config, log_environment},
    logging,
    secrets::MountedSecretProvider,
};

use server::ControllerServer;

/// Admin control plane for the bookstore services
#[derive(Debug, Parser)]
#[command(name = "bookstore-controller", version, about)]
struct Cli {
    /// Path to a YAML config file (defaults to $BOOKSTORE_CONFIG_PATH, then ./config.yaml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load and validate configuration
    let config = load_config(cli.config.as_deref())?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("Bookstore controller starting...");
    info!("HTTP address: {}", config.http_address());
    log_environment();

    // 3. Resolve secrets and connect collaborators
    let secrets = MountedSecretProvider::from_config(&config.secrets);
    let control = init_services(&config, &secrets).await.map_err(|e| {
        error!("Failed to initialize services: {:#}", e);
        e
    })?;

    // 4. Serve until shutdown
    ControllerServer::new(config, control).start().await
}
