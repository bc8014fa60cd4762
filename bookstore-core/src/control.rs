//! Admin control surface
//!
//! Binds the registry, the relay and the fan-out dispatcher behind the five
//! admin operations. Transport-agnostic; the HTTP binding lives in
//! `bookstore-api`.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Result;
use crate::fanout::{FanOutDispatcher, FanOutReport, MessagePusher};
use crate::registry::{ServiceDescriptor, ServiceRegistry};
use crate::relay::{MessageRelay, RelaySettings, TransportMode};

pub struct AdminControlSurface {
    registry: ServiceRegistry,
    relay: Arc<MessageRelay>,
    fan_out: FanOutDispatcher,
}

impl AdminControlSurface {
    pub fn new(
        registry: ServiceRegistry,
        relay: Arc<MessageRelay>,
        pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            relay,
            fan_out: FanOutDispatcher::new(pusher),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn transport_mode(&self) -> TransportMode {
        self.relay.mode()
    }

    /// Register or replace a downstream service; echoes the stored descriptor
    pub fn register_service(&self, descriptor: ServiceDescriptor) -> Result<ServiceDescriptor> {
        self.registry.register(descriptor.clone())?;
        Ok(descriptor)
    }

    pub fn update_settings(&self, settings: &RelaySettings) -> TransportMode {
        self.relay.apply_settings(settings)
    }

    #[must_use]
    pub fn list_services(&self) -> HashMap<String, ServiceDescriptor> {
        self.registry.list()
    }

    /// Send through the bulk channel, then fan out to every registered service
    ///
    /// A bulk-channel failure aborts before any fan-out attempt. Fan-out
    /// failures only show up in the returned report.
    pub async fn send_message(&self, message: &str) -> Result<FanOutReport> {
        let mode = self.relay.send(message).await?;
        let report = self.fan_out.dispatch(&self.registry, message).await;

        info!(
            mode = %mode,
            targets = report.attempted(),
            failed = report.failed(),
            "Message sent"
        );
        Ok(report)
    }

    /// Acknowledge a message pushed by another control surface
    pub fn receive_message(&self, message: &str) {
        debug!(message_len = message.len(), "Message received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_helpers::{RecordingProducer, RecordingPusher};

    struct Harness {
        surface: AdminControlSurface,
        producer: Arc<RecordingProducer>,
        pusher: Arc<RecordingPusher>,
    }

    fn harness(producer: RecordingProducer, pusher: RecordingPusher) -> Harness {
        let producer = Arc::new(producer);
        let pusher = Arc::new(pusher);
        let relay = Arc::new(MessageRelay::new(producer.clone()));
        let surface = AdminControlSurface::new(ServiceRegistry::new(), relay, pusher.clone());
        Harness {
            surface,
            producer,
            pusher,
        }
    }

    fn register_bookstore_services(surface: &AdminControlSurface) {
        surface
            .register_service(ServiceDescriptor::new("catalog", "http://catalog.local"))
            .unwrap();
        surface
            .register_service(ServiceDescriptor::new("cart", "http://cart.local"))
            .unwrap();
    }

    #[test]
    fn test_register_then_list() {
        let h = harness(RecordingProducer::new(), RecordingPusher::new());
        let descriptor = ServiceDescriptor::new("catalog", "http://catalog.local");

        let stored = h.surface.register_service(descriptor.clone()).unwrap();
        assert_eq!(stored, descriptor);
        assert_eq!(h.surface.list_services().get("catalog"), Some(&descriptor));
    }

    #[test]
    fn test_register_empty_name_leaves_registry_untouched() {
        let h = harness(RecordingProducer::new(), RecordingPusher::new());

        let err = h
            .surface
            .register_service(ServiceDescriptor::new("", "http://x.local"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDescriptor(_)));
        assert!(h.surface.list_services().is_empty());
    }

    #[tokio::test]
    async fn test_direct_mode_fans_out_to_every_service() {
        let h = harness(RecordingProducer::new(), RecordingPusher::new());
        register_bookstore_services(&h.surface);

        let report = h.surface.send_message("promo").await.unwrap();

        assert_eq!(report.attempted(), 2);
        assert!(h.producer.records().is_empty());
        let mut pushes = h.pusher.pushes();
        pushes.sort();
        assert_eq!(
            pushes,
            vec![
                ("cart".to_string(), "promo".to_string()),
                ("catalog".to_string(), "promo".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_event_stream_mode_publishes_and_fans_out() {
        let h = harness(RecordingProducer::new(), RecordingPusher::new());
        register_bookstore_services(&h.surface);
        h.surface.update_settings(&RelaySettings::with_event_hub(true));

        let report = h.surface.send_message("promo").await.unwrap();

        assert_eq!(h.producer.records(), vec!["promo".to_string()]);
        assert_eq!(report.attempted(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_skips_fan_out() {
        let h = harness(RecordingProducer::failing(), RecordingPusher::new());
        register_bookstore_services(&h.surface);
        h.surface.update_settings(&RelaySettings::with_event_hub(true));

        let err = h.surface.send_message("promo").await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert!(h.pusher.pushes().is_empty());
    }

    #[tokio::test]
    async fn test_failing_target_does_not_fail_send() {
        let h = harness(RecordingProducer::new(), RecordingPusher::failing_for(&["catalog"]));
        register_bookstore_services(&h.surface);

        let report = h.surface.send_message("promo").await.unwrap();

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(h.pusher.pushes().len(), 2);
    }

    #[tokio::test]
    async fn test_switching_back_to_direct() {
        let h = harness(RecordingProducer::failing(), RecordingPusher::new());
        register_bookstore_services(&h.surface);

        h.surface.update_settings(&RelaySettings::with_event_hub(true));
        assert!(h.surface.send_message("first").await.is_err());

        h.surface.update_settings(&RelaySettings::with_event_hub(false));
        let report = h.surface.send_message("second").await.unwrap();
        assert_eq!(report.attempted(), 2);
    }
}
