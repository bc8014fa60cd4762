//! In-memory registry of downstream services
//!
//! Entries are keyed by service name and only ever inserted or replaced.
//! Nothing is persisted; the registry starts empty on every boot.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::error::{Error, Result};

/// A registered downstream service: unique name plus base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub url: String,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Parse a descriptor from an untyped JSON body
    ///
    /// Missing, null or mistyped fields are reported as `InvalidDescriptor`.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let descriptor: Self = serde_json::from_value(value)
            .map_err(|e| Error::InvalidDescriptor(e.to_string()))?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Names must be non-empty; URLs are not checked here
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidDescriptor(
                "service name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Concurrent name -> descriptor map
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: Arc<DashMap<String, ServiceDescriptor>>,
}

impl ServiceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry keyed by `descriptor.name`
    ///
    /// Returns the descriptor it replaced, if any.
    pub fn register(&self, descriptor: ServiceDescriptor) -> Result<Option<ServiceDescriptor>> {
        descriptor.validate()?;

        let name = descriptor.name.clone();
        let url = descriptor.url.clone();
        let previous = self.services.insert(name.clone(), descriptor);

        match &previous {
            Some(old) if old.url != url => info!(
                service = %name,
                url = %url,
                previous_url = %old.url,
                "Service registration updated"
            ),
            Some(_) => info!(service = %name, url = %url, "Service re-registered"),
            None => info!(service = %name, url = %url, "Service registered"),
        }

        Ok(previous)
    }

    /// Snapshot of every registration completed so far
    #[must_use]
    pub fn list(&self) -> HashMap<String, ServiceDescriptor> {
        self.services
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Descriptors in unspecified order, for iteration without the keys
    #[must_use]
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.services.iter().map(|entry| entry.value().clone()).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ServiceDescriptor> {
        self.services.get(name).map(|entry| entry.value().clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
