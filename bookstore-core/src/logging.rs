//! Process-wide tracing setup
//!
//! `logging.level` is either a bare level (`info`, `debug`, ...) or a full
//! `EnvFilter` directive such as `info,bookstore_core=debug`. A bare level
//! applies to the bookstore crates and the HTTP trace layer; everything else
//! is capped at `warn` so client libraries stay quiet. `RUST_LOG`, when set
//! and valid, replaces the configured value entirely.

use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Targets a bare level is applied to
const BOOKSTORE_TARGETS: &[&str] = &[
    "bookstore_core",
    "bookstore_api",
    "bookstore_controller",
    "tower_http",
];

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };

    let writer = match &config.file_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("Failed to open log file {path}: {e}"))?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    // Exactly one of the two layers is present
    let (json_layer, pretty_layer) = if config.format == "json" {
        let layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_line_number(true)
            .with_writer(writer);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(false)
            .with_writer(writer);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()?;

    Ok(())
}

/// Turn a configured level or directive into a filter
///
/// A value with no `=` or `,` must be a bare level; anything else is handed
/// to `EnvFilter` as-is.
pub fn build_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let directive = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        default_directive(parse_log_level(level)?)
    };

    EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{directive}': {e}"))
}

fn default_directive(level: Level) -> String {
    let base = std::cmp::min(level, Level::WARN);
    let level = level.as_str().to_ascii_lowercase();

    let mut directive = base.as_str().to_ascii_lowercase();
    for target in BOOKSTORE_TARGETS {
        directive.push_str(&format!(",{target}={level}"));
    }
    directive
}

fn parse_log_level(level: &str) -> anyhow::Result<Level> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow::anyhow!("Invalid log level: {level}")),
    }
}
