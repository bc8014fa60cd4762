use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Error, Result};

/// Settings key selecting the bulk channel transport
pub const USE_EVENT_HUB: &str = "useEventHub";

/// Which transport the bulk channel uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Bulk channel is a no-op; delivery happens through fan-out only
    #[default]
    Direct,
    /// Every message is appended to the event stream
    EventStream,
}

impl TransportMode {
    #[must_use]
    pub const fn from_flag(use_event_hub: bool) -> Self {
        if use_event_hub {
            Self::EventStream
        } else {
            Self::Direct
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::EventStream => write!(f, "event_stream"),
        }
    }
}

/// A settings update for the relay
///
/// Recognized keys get typed fields; everything else is kept in
/// `unrecognized` and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelaySettings {
    #[serde(rename = "useEventHub", default, skip_serializing_if = "Option::is_none")]
    pub use_event_hub: Option<bool>,

    #[serde(flatten)]
    pub unrecognized: Map<String, Value>,
}

impl RelaySettings {
    #[must_use]
    pub fn with_event_hub(use_event_hub: bool) -> Self {
        Self {
            use_event_hub: Some(use_event_hub),
            unrecognized: Map::new(),
        }
    }

    /// Build settings from an untyped JSON body
    ///
    /// The body must be an object. A recognized key holding the wrong type
    /// (including `null`) is an `InvalidSettings` error.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(Error::InvalidSettings(
                "settings must be a JSON object".to_string(),
            ));
        };

        let use_event_hub = match map.remove(USE_EVENT_HUB) {
            None => None,
            Some(Value::Bool(flag)) => Some(flag),
            Some(other) => {
                return Err(Error::InvalidSettings(format!(
                    "{USE_EVENT_HUB} must be a boolean, got {other}"
                )))
            }
        };

        Ok(Self {
            use_event_hub,
            unrecognized: map,
        })
    }

    /// Names of keys that will be ignored
    pub fn ignored_keys(&self) -> impl Iterator<Item = &str> {
        self.unrecognized.keys().map(String::as_str)
    }
}
