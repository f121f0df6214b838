//! Nearby 311 noise complaints from the companion complaints service.
//!
//! `GET <base>/api/near?lon=<lng>&lat=<lat>&distanceInKm=<r>` answers with a
//! JSON array. The lookup is advisory: any failure yields an empty list.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::providers::{transport_message, USER_AGENT};
use super::types::Coordinates;

/// Search radius around a validated address.
pub const DEFAULT_RADIUS_KM: f64 = 0.5;

/// One complaint record. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_key: Option<String>,
    /// Local timestamp as sent by the service, e.g. `2024-03-01T23:41:00`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borough: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Clone)]
pub struct ComplaintsClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ComplaintsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Complaints within `radius_km` of `center`, or an empty list if the
    /// service cannot be reached or answers with anything but a JSON array.
    pub fn nearby(&self, center: Coordinates, radius_km: f64) -> Vec<Complaint> {
        match self.fetch(center, radius_km) {
            Ok(complaints) => complaints,
            Err(e) => {
                warn!(error = %e, lat = center.lat, lng = center.lng, "complaints lookup failed");
                Vec::new()
            }
        }
    }

    pub fn fetch(&self, center: Coordinates, radius_km: f64) -> Result<Vec<Complaint>, String> {
        let url = format!("{}/api/near", self.base_url);
        debug!(url = %url, lat = center.lat, lng = center.lng, radius_km, "fetching complaints");

        let response = self
            .agent
            .get(&url)
            .query("lon", &center.lng.to_string())
            .query("lat", &center.lat.to_string())
            .query("distanceInKm", &radius_km.to_string())
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => format!("HTTP error! status: {}", code),
                ureq::Error::Transport(t) => transport_message(&t),
            })?;

        let body = response.into_string().map_err(|e| e.to_string())?;
        parse_complaints(&body)
    }
}

pub(crate) fn parse_complaints(body: &str) -> Result<Vec<Complaint>, String> {
    serde_json::from_str(body).map_err(|e| format!("invalid complaints body: {}", e))
}
