use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub secrets: SecretsConfig,
    pub event_stream: EventStreamConfig,
    pub fan_out: FanOutConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Where mounted secrets are looked up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Directory holding one file per secret (Kubernetes/Docker secret mounts)
    pub dir: String,
    /// Prefix of the fallback environment variables
    pub env_prefix: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            dir: "/run/secrets".to_string(),
            env_prefix: "BOOKSTORE_SECRET_".to_string(),
        }
    }
}

/// Bulk broadcast channel (event stream) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventStreamConfig {
    /// Name of the secret holding the stream connection string
    pub connection_secret: String,
    /// Stream key records are appended to
    pub stream_name: String,
    /// Approximate retention of the stream, in records
    pub max_len: usize,
    pub timeout_seconds: u64,
}

impl Default for EventStreamConfig {
    fn default() -> Self {
        Self {
            connection_secret: "eventhub-connection-string".to_string(),
            stream_name: "bookstore-events".to_string(),
            max_len: 10_000,
            timeout_seconds: 5,
        }
    }
}

/// Direct HTTP fan-out settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
    pub request_timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    /// Path appended to each registered service's base URL
    pub receive_path: String,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 10,
            connect_timeout_seconds: 3,
            receive_path: "/receive-message".to_string(),
        }
    }
}

/// Initial relay settings applied at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub use_event_hub: bool,
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // BOOKSTORE_SERVER__HTTP_PORT, BOOKSTORE_EVENT_STREAM__STREAM_NAME, ...
        builder = builder.add_source(
            Environment::with_prefix("BOOKSTORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Get HTTP address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }

    /// Check the configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.http_port == 0 {
            errors.push("server.http_port must be non-zero".to_string());
        }
        if self.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be \"json\" or \"pretty\", got \"{}\"",
                self.logging.format
            ));
        }
        if self.event_stream.connection_secret.trim().is_empty() {
            errors.push("event_stream.connection_secret must not be empty".to_string());
        }
        if self.event_stream.stream_name.trim().is_empty() {
            errors.push("event_stream.stream_name must not be empty".to_string());
        }
        if self.event_stream.timeout_seconds == 0 {
            errors.push("event_stream.timeout_seconds must be non-zero".to_string());
        }
        if self.fan_out.request_timeout_seconds == 0 {
            errors.push("fan_out.request_timeout_seconds must be non-zero".to_string());
        }
        if self.fan_out.connect_timeout_seconds == 0 {
            errors.push("fan_out.connect_timeout_seconds must be non-zero".to_string());
        }
        if !self.fan_out.receive_path.starts_with('/') {
            errors.push(format!(
                "fan_out.receive_path must start with '/', got \"{}\"",
                self.fan_out.receive_path
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
