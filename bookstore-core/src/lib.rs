pub mod config;
pub mod error;
pub mod logging;
pub mod secrets;
pub mod bootstrap;
pub mod registry;
pub mod relay;
pub mod fanout;
pub mod control;

#[cfg(test)]
pub mod test_helpers;

pub use config::Config;
pub use error::{Error, Result};
pub use registry::{ServiceDescriptor, ServiceRegistry};
pub use relay::{EventStreamProducer, MessageRelay, RelaySettings, TransportMode};
pub use fanout::{FanOutDispatcher, FanOutReport, HttpPusher, MessagePusher};
pub use control::AdminControlSurface;
