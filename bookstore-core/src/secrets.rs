//! Secret resolution for startup-time credentials
//!
//! The event-stream connection string is the only secret the control plane
//! needs. It is resolved once at startup through a [`SecretProvider`]; a
//! failure there prevents the process from becoming ready.
//!
//! # Supported Sources
//!
//! 1. **Files** (recommended for Kubernetes/Docker secrets):
//!    - One file per secret under a mount directory, e.g.
//!      `/run/secrets/eventhub-connection-string`
//!
//! 2. **Environment Variables** (fallback):
//!    - `BOOKSTORE_SECRET_EVENTHUB_CONNECTION_STRING`
//!    - Less secure as visible in process list and container inspect
//!
//! Secret values are never logged; use [`mask_secret`] when a log line has to
//! mention one.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::SecretsConfig;

/// Resolves a secret value from its logical name
pub trait SecretProvider: Send + Sync {
    fn get_secret(&self, name: &str) -> Result<String>;
}

/// Source for loading secrets
#[derive(Debug, Clone)]
pub enum SecretSource {
    /// Load secret from a file path
    File(PathBuf),
    /// Load secret from an environment variable
    Env(String),
}

/// Secret loader with multiple source support
pub struct SecretLoader;

impl SecretLoader {
    /// Load a secret from a specified source
    ///
    /// Only the secret name and source are logged. Empty values are rejected.
    pub fn load(name: &str, source: &SecretSource) -> Result<String> {
        match source {
            SecretSource::File(path) => {
                debug!(secret_name = name, source = "file", path = %path.display(), "Loading secret from file");
                let content = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read secret '{}' from file '{}'", name, path.display())
                })?;

                let trimmed = content.trim().to_string();

                if trimmed.is_empty() {
                    anyhow::bail!("Secret '{}' from file '{}' is empty", name, path.display());
                }

                debug!(secret_name = name, secret_len = trimmed.len(), "Secret loaded successfully from file");
                Ok(trimmed)
            }
            SecretSource::Env(env_var) => {
                debug!(secret_name = name, source = "env", env_var = %env_var, "Loading secret from environment");

                let value = std::env::var(env_var).with_context(|| {
                    format!("Failed to read secret '{name}' from environment variable '{env_var}'")
                })?;

                if value.is_empty() {
                    anyhow::bail!("Secret '{name}' from environment variable '{env_var}' is empty");
                }

                warn!(
                    secret_name = name,
                    env_var = %env_var,
                    "Loaded secret from environment variable (less secure than file-based secrets)"
                );
                Ok(value)
            }
        }
    }

    /// Load a secret with fallback sources
    ///
    /// Attempts to load from the primary source first, then falls back to secondary source.
    pub fn load_with_fallback(name: &str, primary: &SecretSource, fallback: &SecretSource) -> Result<String> {
        match Self::load(name, primary) {
            Ok(secret) => Ok(secret),
            Err(primary_err) => {
                debug!(
                    secret_name = name,
                    primary_error = %primary_err,
                    "Primary secret source failed, trying fallback"
                );

                Self::load(name, fallback).with_context(|| {
                    format!(
                        "Failed to load secret '{name}' from both primary and fallback sources. Primary error: {primary_err}"
                    )
                })
            }
        }
    }
}

/// Secrets mounted as files, with environment variables as fallback
#[derive(Debug, Clone)]
pub struct MountedSecretProvider {
    dir: PathBuf,
    env_prefix: String,
}

impl MountedSecretProvider {
    pub fn new(dir: impl Into<PathBuf>, env_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            env_prefix: env_prefix.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SecretsConfig) -> Self {
        Self::new(&config.dir, &config.env_prefix)
    }

    /// Environment variable consulted when the secret file is missing
    ///
    /// `eventhub-connection-string` -> `<prefix>EVENTHUB_CONNECTION_STRING`
    #[must_use]
    pub fn env_var_for(&self, name: &str) -> String {
        let suffix: String = name
            .chars()
            .map(|c| match c {
                '-' | '.' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        format!("{}{}", self.env_prefix, suffix)
    }
}

impl SecretProvider for MountedSecretProvider {
    fn get_secret(&self, name: &str) -> Result<String> {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            anyhow::bail!("Invalid secret name '{name}'");
        }

        SecretLoader::load_with_fallback(
            name,
            &SecretSource::File(self.dir.join(name)),
            &SecretSource::Env(self.env_var_for(name)),
        )
    }
}

/// Helper to sanitize secret values for safe logging
///
/// Replaces the actual secret with a masked version showing only length.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    format!("[SECRET:{} chars]", secret.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_secret_file_trims_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "  redis://stream.local:6379  \n").unwrap();

        let secret = SecretLoader::load("token", &SecretSource::File(path)).unwrap();
        assert_eq!(secret, "redis://stream.local:6379");
    }

    #[test]
    fn test_load_secret_file_not_found() {
        let result = SecretLoader::load("test", &SecretSource::File(PathBuf::from("/nonexistent/path")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_secret_empty_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, "\n").unwrap();

        let err = SecretLoader::load("empty", &SecretSource::File(path)).unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn test_mounted_provider_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("eventhub-connection-string"), "redis://hub:6379/0").unwrap();

        let provider = MountedSecretProvider::new(dir.path(), "BOOKSTORE_TEST_SECRET_A_");
        let secret = provider.get_secret("eventhub-connection-string").unwrap();
        assert_eq!(secret, "redis://hub:6379/0");
    }

    #[test]
    fn test_mounted_provider_falls_back_to_env() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MountedSecretProvider::new(dir.path(), "BOOKSTORE_TEST_SECRET_B_");
        let env_var = provider.env_var_for("eventhub-connection-string");
        assert_eq!(env_var, "BOOKSTORE_TEST_SECRET_B_EVENTHUB_CONNECTION_STRING");

        std::env::set_var(&env_var, "redis://env-hub:6379");
        let secret = provider.get_secret("eventhub-connection-string");
        std::env::remove_var(&env_var);

        assert_eq!(secret.unwrap(), "redis://env-hub:6379");
    }

    #[test]
    fn test_mounted_provider_missing_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MountedSecretProvider::new(dir.path(), "BOOKSTORE_TEST_SECRET_C_");

        let err = provider.get_secret("missing-secret").unwrap_err();
        assert!(err.to_string().contains("missing-secret"));
    }

    #[test]
    fn test_mounted_provider_rejects_path_names() {
        let provider = MountedSecretProvider::new("/run/secrets", "BOOKSTORE_TEST_SECRET_D_");
        assert!(provider.get_secret("../etc/passwd").is_err());
        assert!(provider.get_secret("").is_err());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("password123"), "[SECRET:11 chars]");
        assert_eq!(mask_secret(""), "[SECRET:0 chars]");
    }
}
