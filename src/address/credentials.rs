//! API key provisioning.
//!
//! Order: explicit key (flag or env) → local key store → remote key endpoint.
//! A key fetched remotely is written back to the store for next time.
//! Store file: `<config_dir>/nyc-address-validator/credentials.json`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::providers::transport_message;
use crate::config::GeocoderConfig;

/// An opaque provider credential. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(<redacted, {} chars>)", self.0.len())
    }
}

/// Where a key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Explicit,
    Stored,
    Remote,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Stored => write!(f, "key store"),
            Self::Remote => write!(f, "remote server"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Api key not retrieved: {0}")]
    Remote(String),

    #[error("Key store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key store encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No API key available. Use --api-key, NYCADDR_API_KEY, or --key-url")]
    Unavailable,
}

#[derive(Serialize, Deserialize)]
struct StoredKey {
    api_key: String,
    /// Unix millis of when the key was saved.
    #[serde(default)]
    fetched_at: i64,
}

/// JSON file holding a previously fetched key.
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nyc-address-validator")
            .join("credentials.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored key, if the file exists, parses, and holds a non-blank key.
    pub fn load(&self) -> Option<ApiKey> {
        let data = fs::read_to_string(&self.path).ok()?;
        let stored: StoredKey = serde_json::from_str(&data).ok()?;
        let key = stored.api_key.trim();
        if key.is_empty() {
            return None;
        }
        Some(ApiKey::new(key))
    }

    pub fn save(&self, key: &ApiKey) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredKey {
            api_key: key.expose().to_string(),
            fetched_at: chrono::Utc::now().timestamp_millis(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }
}

/// Resolves the API key once at startup.
pub struct KeyProvider {
    explicit: Option<String>,
    store: KeyStore,
    remote_url: Option<String>,
    timeout: Duration,
}

impl KeyProvider {
    pub fn from_config(config: &GeocoderConfig) -> Self {
        Self {
            explicit: config.api_key.clone(),
            store: KeyStore::at(config.key_store_path.clone()),
            remote_url: config.key_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn resolve(&self) -> Result<(ApiKey, KeySource), CredentialError> {
        if let Some(key) = self.explicit.as_deref().map(str::trim) {
            if !key.is_empty() {
                return Ok((ApiKey::new(key), KeySource::Explicit));
            }
        }

        if let Some(key) = self.store.load() {
            info!(key_len = key.len(), path = %self.store.path().display(), "API key loaded from store");
            return Ok((key, KeySource::Stored));
        }

        let Some(url) = self.remote_url.as_deref() else {
            return Err(CredentialError::Unavailable);
        };

        let key = fetch_remote_key(url, self.timeout)?;
        info!(key_len = key.len(), "API key loaded from remote server");
        if let Err(e) = self.store.save(&key) {
            warn!(error = %e, "could not persist API key");
        }
        Ok((key, KeySource::Remote))
    }
}

fn fetch_remote_key(url: &str, timeout: Duration) -> Result<ApiKey, CredentialError> {
    let response = ureq::get(url)
        .timeout(timeout)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, response) => CredentialError::Remote(format!(
                "{} statusText: {}",
                code,
                response.status_text()
            )),
            ureq::Error::Transport(t) => CredentialError::Remote(transport_message(&t)),
        })?;

    let body = response
        .into_string()
        .map_err(|e| CredentialError::Remote(e.to_string()))?;
    let key = body.trim();
    if key.is_empty() {
        return Err(CredentialError::Remote("empty key in response".into()));
    }
    Ok(ApiKey::new(key))
}
