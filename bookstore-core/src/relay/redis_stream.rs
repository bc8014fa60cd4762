//! Redis Streams backed event producer

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::streams::StreamMaxlen;
use redis::AsyncCommands;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

use super::producer::{EventStreamProducer, ProducerError};
use crate::config::EventStreamConfig;

/// Field name each record's payload is stored under
const PAYLOAD_FIELD: &str = "payload";

/// Appends records to a Redis Stream with `XADD ... MAXLEN ~`
///
/// The connection string (a Redis URL) comes from the secret store.
pub struct RedisStreamProducer {
    conn: ConnectionManager,
    stream_name: String,
    max_len: usize,
    op_timeout: Duration,
}

impl RedisStreamProducer {
    /// Open the connection used for every later `send`
    pub async fn connect(
        connection_string: &str,
        config: &EventStreamConfig,
    ) -> Result<Self, ProducerError> {
        let op_timeout = Duration::from_secs(config.timeout_seconds);

        let client = redis::Client::open(connection_string)
            .map_err(|e| ProducerError::Connection(format!("Invalid event stream URL: {e}")))?;

        let conn = timeout(op_timeout, client.get_connection_manager())
            .await
            .map_err(|_| ProducerError::Timeout)?
            .map_err(|e| ProducerError::Connection(e.to_string()))?;

        info!(
            stream = %config.stream_name,
            max_len = config.max_len,
            "Event stream producer connected"
        );

        Ok(Self {
            conn,
            stream_name: config.stream_name.clone(),
            max_len: config.max_len,
            op_timeout,
        })
    }
}

#[async_trait]
impl EventStreamProducer for RedisStreamProducer {
    async fn send(&self, record: &str) -> Result<(), ProducerError> {
        let mut conn = self.conn.clone();

        let entry_id: String = timeout(
            self.op_timeout,
            conn.xadd_maxlen::<_, _, _, _, String>(
                &self.stream_name,
                StreamMaxlen::Approx(self.max_len),
                "*",
                &[(PAYLOAD_FIELD, record)],
            ),
        )
        .await
        .map_err(|_| ProducerError::Timeout)?
        .map_err(|e| ProducerError::Rejected(e.to_string()))?;

        debug!(
            stream = %self.stream_name,
            entry_id = %entry_id,
            record_len = record.len(),
            "Record appended to event stream"
        );
        Ok(())
    }

    fn destination(&self) -> &str {
        &self.stream_name
    }
}
