//! Direct HTTP fan-out to registered services
//!
//! Every registered service gets one delivery attempt per message. Attempts
//! run one after another; a failed attempt is recorded and logged but never
//! stops the loop or fails the overall send.

use async_trait::async_trait;
use reqwest::{header, Client};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::FanOutConfig;
use crate::error::{Error, Result};
use crate::registry::{ServiceDescriptor, ServiceRegistry};

/// Why a single target did not accept a message
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid target URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Target responded with status {status}")]
    Status { status: u16 },
}

/// Delivers one message to one registered service
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn push(&self, target: &ServiceDescriptor, message: &str) -> std::result::Result<(), DeliveryError>;
}

/// `POST <service url><receive path>` with the raw message as body
pub struct HttpPusher {
    client: Client,
    receive_path: String,
}

impl HttpPusher {
    pub fn new(config: &FanOutConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, &config.receive_path))
    }

    pub fn with_client(client: Client, receive_path: impl Into<String>) -> Self {
        Self {
            client,
            receive_path: receive_path.into(),
        }
    }

    /// Endpoint a message for `target` is posted to
    pub fn target_url(&self, target: &ServiceDescriptor) -> std::result::Result<Url, DeliveryError> {
        let raw = format!("{}{}", target.url.trim_end_matches('/'), self.receive_path);

        let url = Url::parse(&raw).map_err(|e| DeliveryError::InvalidTarget {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(DeliveryError::InvalidTarget {
                url: raw,
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }
}

#[async_trait]
impl MessagePusher for HttpPusher {
    async fn push(&self, target: &ServiceDescriptor, message: &str) -> std::result::Result<(), DeliveryError> {
        let url = self.target_url(target)?;

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(message.to_owned())
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status {
                status: status.as_u16(),
            })
        }
    }
}

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub service: String,
    pub url: String,
    /// `None` when the target accepted the message
    pub error: Option<String>,
}

impl DeliveryOutcome {
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-target outcomes of one fan-out pass
#[derive(Debug, Clone, Default)]
pub struct FanOutReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl FanOutReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted() - self.delivered()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryOutcome> {
        self.outcomes.iter().filter(|o| !o.is_delivered())
    }
}

/// Sequential, failure-isolated delivery to every registry entry
#[derive(Clone)]
pub struct FanOutDispatcher {
    pusher: Arc<dyn MessagePusher>,
}

impl FanOutDispatcher {
    pub fn new(pusher: Arc<dyn MessagePusher>) -> Self {
        Self { pusher }
    }

    /// Attempt delivery to every service registered at the time of the call
    pub async fn dispatch(&self, registry: &ServiceRegistry, message: &str) -> FanOutReport {
        let targets = registry.descriptors();
        let mut report = FanOutReport {
            outcomes: Vec::with_capacity(targets.len()),
        };

        for target in &targets {
            let error = match self.pusher.push(target, message).await {
                Ok(()) => {
                    debug!(service = %target.name, url = %target.url, "Message delivered");
                    None
                }
                Err(e) => {
                    warn!(
                        service = %target.name,
                        url = %target.url,
                        error = %e,
                        "Failed to deliver message to service, continuing fan-out"
                    );
                    Some(e.to_string())
                }
            };

            report.outcomes.push(DeliveryOutcome {
                service: target.name.clone(),
                url: target.url.clone(),
                error,
            });
        }

        if report.attempted() > 0 {
            info!(
                attempted = report.attempted(),
                delivered = report.delivered(),
                failed = report.failed(),
                "Fan-out complete"
            );
        }

        report
    }
}
