//! Startup environment report

use tracing::info;

use crate::secrets::mask_secret;

/// Variables reported at startup; `true` marks values that may hold secrets
const REPORTED_VARS: &[(&str, bool)] = &[
    ("BOOKSTORE_CONFIG_PATH", false),
    ("BOOKSTORE_SECRETS__DIR", false),
    ("BOOKSTORE_EVENT_STREAM__CONNECTION_SECRET", false),
    ("BOOKSTORE_EVENT_STREAM__STREAM_NAME", false),
    ("BOOKSTORE_SECRET_EVENTHUB_CONNECTION_STRING", true),
    ("RUST_LOG", false),
];

/// Render one variable for the startup log
fn describe(value: Option<&str>, sensitive: bool) -> String {
    match value {
        None => "<unset>".to_string(),
        Some(v) if sensitive => mask_secret(v),
        Some(v) => v.to_string(),
    }
}

/// Log which recognized environment variables are set
///
/// Secret-bearing values are masked.
pub fn log_environment() {
    info!("Environment variables:");
    for (name, sensitive) in REPORTED_VARS {
        let value = std::env::var(name).ok();
        info!("{}: {}", name, describe(value.as_deref(), *sensitive));
    }
}
