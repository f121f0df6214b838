//! Runtime configuration for the geocoding and map collaborators.

use std::path::PathBuf;

use crate::address::credentials::KeyStore;

pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Key given on the command line or in the environment.
    pub api_key: Option<String>,
    /// Endpoint returning a key as plain text, tried when nothing else is set.
    pub key_url: Option<String>,
    pub geocode_endpoint: String,
    pub static_map_endpoint: String,
    /// Base URL of the noise complaints service. The lookup is off when unset.
    pub complaints_url: Option<String>,
    pub timeout_secs: u64,
    pub key_store_path: PathBuf,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            key_url: None,
            geocode_endpoint: DEFAULT_GEOCODE_ENDPOINT.to_string(),
            static_map_endpoint: DEFAULT_STATIC_MAP_ENDPOINT.to_string(),
            complaints_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            key_store_path: KeyStore::default_path(),
        }
    }
}
