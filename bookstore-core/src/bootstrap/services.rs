//! Collaborator wiring

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::control::AdminControlSurface;
use crate::fanout::HttpPusher;
use crate::registry::ServiceRegistry;
use crate::relay::{EventStreamProducer, MessageRelay, RedisStreamProducer, TransportMode};
use crate::secrets::{mask_secret, SecretProvider};

/// Resolve the event-stream secret, connect the producer and build the
/// control surface
///
/// Every failure here is a startup configuration error.
pub async fn init_services(
    config: &Config,
    secrets: &dyn SecretProvider,
) -> Result<Arc<AdminControlSurface>> {
    let secret_name = &config.event_stream.connection_secret;
    let connection_string = secrets
        .get_secret(secret_name)
        .with_context(|| format!("Failed to resolve event stream secret '{secret_name}'"))?;
    info!(
        secret = %secret_name,
        value = %mask_secret(&connection_string),
        "Retrieved event stream connection string"
    );

    let producer = RedisStreamProducer::connect(&connection_string, &config.event_stream)
        .await
        .context("Failed to initialize event stream producer")?;

    build_control_surface(config, Arc::new(producer))
}

/// Build the control surface around an already connected producer
pub fn build_control_surface(
    config: &Config,
    producer: Arc<dyn EventStreamProducer>,
) -> Result<Arc<AdminControlSurface>> {
    let pusher = HttpPusher::new(&config.fan_out).context("Failed to initialize fan-out client")?;

    let mode = TransportMode::from_flag(config.relay.use_event_hub);
    let relay = Arc::new(MessageRelay::with_mode(producer, mode));
    info!(mode = %mode, "MessageRelay initialized");

    let surface = AdminControlSurface::new(ServiceRegistry::new(), relay, Arc::new(pusher));
    info!("AdminControlSurface initialized");

    Ok(Arc::new(surface))
}
