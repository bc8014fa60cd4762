//! In-memory fakes for the relay and fan-out collaborators

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;

use crate::fanout::{DeliveryError, MessagePusher};
use crate::registry::ServiceDescriptor;
use crate::relay::{EventStreamProducer, ProducerError};

/// Event stream producer that remembers every record
pub struct RecordingProducer {
    records: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingProducer {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Producer whose every send is rejected
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn records(&self) -> Vec<String> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl EventStreamProducer for RecordingProducer {
    async fn send(&self, record: &str) -> Result<(), ProducerError> {
        if self.fail {
            return Err(ProducerError::Rejected("stream unavailable".to_string()));
        }
        self.records.lock().push(record.to_string());
        Ok(())
    }

    fn destination(&self) -> &str {
        "test-stream"
    }
}

/// Pusher that records (service, message) pairs, failing for chosen services
pub struct RecordingPusher {
    pushes: Mutex<Vec<(String, String)>>,
    failing: HashSet<String>,
}

impl RecordingPusher {
    pub fn new() -> Self {
        Self::failing_for(&[])
    }

    pub fn failing_for(services: &[&str]) -> Self {
        Self {
            pushes: Mutex::new(Vec::new()),
            failing: services.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn pushes(&self) -> Vec<(String, String)> {
        self.pushes.lock().clone()
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn push(&self, target: &ServiceDescriptor, message: &str) -> Result<(), DeliveryError> {
        self.pushes
            .lock()
            .push((target.name.clone(), message.to_string()));

        if self.failing.contains(&target.name) {
            return Err(DeliveryError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}
