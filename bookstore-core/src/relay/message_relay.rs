use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::producer::EventStreamProducer;
use super::settings::{RelaySettings, TransportMode};
use crate::error::{Error, Result};

/// Routes each outbound message to the bulk channel selected by the
/// current transport mode
pub struct MessageRelay {
    producer: Arc<dyn EventStreamProducer>,
    mode: RwLock<TransportMode>,
}

impl MessageRelay {
    /// Create a relay in `Direct` mode
    pub fn new(producer: Arc<dyn EventStreamProducer>) -> Self {
        Self::with_mode(producer, TransportMode::Direct)
    }

    pub fn with_mode(producer: Arc<dyn EventStreamProducer>, mode: TransportMode) -> Self {
        Self {
            producer,
            mode: RwLock::new(mode),
        }
    }

    #[must_use]
    pub fn mode(&self) -> TransportMode {
        *self.mode.read()
    }

    /// Merge a settings update
    ///
    /// Only `useEventHub` changes state. Unknown keys are accepted and
    /// ignored. Returns the mode in effect afterwards.
    pub fn apply_settings(&self, settings: &RelaySettings) -> TransportMode {
        for key in settings.ignored_keys() {
            debug!(key = %key, "Ignoring unrecognized relay setting");
        }

        let Some(use_event_hub) = settings.use_event_hub else {
            return self.mode();
        };

        let next = TransportMode::from_flag(use_event_hub);
        let previous = {
            let mut mode = self.mode.write();
            std::mem::replace(&mut *mode, next)
        };

        if previous == next {
            debug!(mode = %next, "Relay transport mode unchanged");
        } else {
            info!(from = %previous, to = %next, "Relay transport mode switched");
        }
        next
    }

    /// Push a message through the bulk channel
    ///
    /// In `Direct` mode this does nothing. In `EventStream` mode the message
    /// is sent as one record; a producer failure is returned as
    /// `Error::Transport` and not retried. Returns the mode that was used.
    pub async fn send(&self, message: &str) -> Result<TransportMode> {
        // Copy the mode out so the lock is not held across the await
        let mode = self.mode();

        match mode {
            TransportMode::Direct => {
                debug!(message_len = message.len(), "Direct mode, bulk channel skipped");
            }
            TransportMode::EventStream => {
                self.producer.send(message).await.map_err(|e| {
                    error!(
                        destination = %self.producer.destination(),
                        error = %e,
                        "Failed to publish message to event stream"
                    );
                    Error::from(e)
                })?;
                debug!(
                    destination = %self.producer.destination(),
                    message_len = message.len(),
                    "Message published to event stream"
                );
            }
        }

        Ok(mode)
    }
}
