//! Bulk broadcast channel
//!
//! [`MessageRelay`] owns the transport-mode switch and, in event-stream mode,
//! hands every outbound message to an [`EventStreamProducer`]. Point-to-point
//! delivery to registered services lives in [`crate::fanout`].

mod message_relay;
mod producer;
mod redis_stream;
mod settings;

pub use message_relay::MessageRelay;
pub use producer::{EventStreamProducer, ProducerError};
pub use redis_stream::RedisStreamProducer;
pub use settings::{RelaySettings, TransportMode, USE_EVENT_HUB};
