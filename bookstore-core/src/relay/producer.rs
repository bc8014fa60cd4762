use async_trait::async_trait;
use thiserror::Error;

/// Failure to hand a record to the event stream
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("Event stream connection failed: {0}")]
    Connection(String),

    #[error("Event stream operation timed out")]
    Timeout,

    #[error("Event stream rejected record: {0}")]
    Rejected(String),
}

/// Publishes opaque records to a managed event stream
#[async_trait]
pub trait EventStreamProducer: Send + Sync {
    /// Append a single record; errors are not retried
    async fn send(&self, record: &str) -> Result<(), ProducerError>;

    /// Human-readable destination, for logs
    fn destination(&self) -> &str;
}
