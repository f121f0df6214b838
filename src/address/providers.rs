//! Geocoding gateway: the `Geocoder` seam and the Google Geocoding backend.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::credentials::ApiKey;
use super::types::{Coordinates, GeocodeError, GeocodeResult, LocationType};
use crate::config::GeocoderConfig;

pub(crate) const USER_AGENT: &str = concat!("nycaddr/", env!("CARGO_PKG_VERSION"));

/// Resolves a normalized address to ranked candidates, best first.
///
/// An empty vector means the provider found nothing; that is not an error.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, GeocodeError>;
}

// ─── Wire format ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<WireResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResult {
    formatted_address: String,
    geometry: WireGeometry,
    #[serde(default)]
    partial_match: bool,
}

#[derive(Debug, Deserialize)]
struct WireGeometry {
    location: Coordinates,
    location_type: LocationType,
}

/// Turn a decoded provider response into typed candidates.
pub(crate) fn interpret_response(
    response: GeocodeResponse,
) -> Result<Vec<GeocodeResult>, GeocodeError> {
    match response.status.as_str() {
        "OK" => response
            .results
            .into_iter()
            .map(|r| {
                if !r.geometry.location.is_valid() {
                    return Err(GeocodeError::InvalidResponse(format!(
                        "coordinates out of range for '{}'",
                        r.formatted_address
                    )));
                }
                Ok(GeocodeResult {
                    formatted_address: r.formatted_address,
                    coordinates: r.geometry.location,
                    location_type: r.geometry.location_type,
                    partial_match: r.partial_match,
                })
            })
            .collect(),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => {
            if let Some(msg) = &response.error_message {
                warn!(status, message = %msg, "geocoder rejected request");
            }
            Err(GeocodeError::Upstream(status.to_string()))
        }
    }
}

/// Parse a raw JSON body from the provider.
pub(crate) fn parse_body(body: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
    let response: GeocodeResponse = serde_json::from_str(body)
        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
    interpret_response(response)
}

// ─── Google Geocoding API ───────────────────────────────────────

/// Blocking client for the Google Geocoding JSON endpoint.
pub struct GoogleGeocoder {
    agent: ureq::Agent,
    endpoint: String,
    key: ApiKey,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocoderConfig, key: ApiKey) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            endpoint: config.geocode_endpoint.clone(),
            key,
        }
    }
}

impl Geocoder for GoogleGeocoder {
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
        if self.key.expose().is_empty() {
            return Err(GeocodeError::MissingKey);
        }
        debug!(endpoint = %self.endpoint, address, "geocoding");

        let response = match self
            .agent
            .get(&self.endpoint)
            .query("address", address)
            .query("key", self.key.expose())
            .call()
        {
            Ok(response) => response,
            // Google reports most failures in a 200 body, but a 4xx/5xx may still carry one.
            Err(ureq::Error::Status(code, response)) => {
                return match response.into_string().ok().map(|body| parse_body(&body)) {
                    Some(Ok(results)) => Ok(results),
                    Some(Err(GeocodeError::Upstream(status))) => Err(GeocodeError::Upstream(status)),
                    _ => Err(GeocodeError::Upstream(format!("HTTP {}", code))),
                };
            }
            Err(ureq::Error::Transport(t)) => {
                let msg = transport_message(&t);
                warn!(error = %msg, "geocoder unreachable");
                return Err(GeocodeError::Transport(msg));
            }
        };

        let body = response
            .into_string()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
        let results = parse_body(&body)?;
        debug!(results = results.len(), "geocoder replied");
        Ok(results)
    }
}

/// Describe a transport failure without the request URL, whose query carries the key.
pub(crate) fn transport_message(t: &ureq::Transport) -> String {
    let mut msg = t.kind().to_string();
    if let Some(detail) = t.message() {
        msg.push_str(": ");
        msg.push_str(detail);
    }
    if let Some(source) = std::error::Error::source(t) {
        msg.push_str(": ");
        msg.push_str(&source.to_string());
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::testing::{serve_once, REFUSED_URL};

    const OK_BODY: &str = r#"{
        "results": [
            {
                "formatted_address": "1560 Broadway, New York, NY 10036, USA",
                "geometry": {
                    "location": { "lat": 40.7580, "lng": -73.9855 },
                    "location_type": "ROOFTOP",
                    "viewport": {}
                },
                "place_id": "abc",
                "types": ["street_address"]
            },
            {
                "formatted_address": "Broadway, New York, NY, USA",
                "geometry": {
                    "location": { "lat": 40.79, "lng": -73.97 },
                    "location_type": "GEOMETRIC_CENTER"
                },
                "partial_match": true
            }
        ],
        "status": "OK"
    }"#;

    #[test]
    fn test_parse_ok() {
        let results = parse_body(OK_BODY).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].formatted_address, "1560 Broadway, New York, NY 10036, USA");
        assert_eq!(results[0].location_type, LocationType::Rooftop);
        assert!(!results[0].partial_match);
        assert!((results[0].coordinates.lat - 40.7580).abs() < 1e-9);
        assert!(results[1].partial_match);
        assert_eq!(results[1].location_type, LocationType::GeometricCenter);
    }

    #[test]
    fn test_parse_zero_results() {
        let results = parse_body(r#"{"results": [], "status": "ZERO_RESULTS"}"#).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_upstream_status() {
        let err = parse_body(
            r#"{"results": [], "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        )
        .unwrap_err();
        assert_eq!(err, GeocodeError::Upstream("REQUEST_DENIED".into()));
    }

    #[test]
    fn test_parse_missing_geometry_is_invalid() {
        let err = parse_body(
            r#"{"results": [{"formatted_address": "Somewhere"}], "status": "OK"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_out_of_range_coordinates() {
        let err = parse_body(
            r#"{"results": [{"formatted_address": "Nowhere",
                "geometry": {"location": {"lat": 123.0, "lng": 0.0}, "location_type": "ROOFTOP"}}],
                "status": "OK"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_body("<html>"), Err(GeocodeError::InvalidResponse(_))));
    }

    fn geocoder_at(endpoint: &str, key: &str) -> GoogleGeocoder {
        let config = GeocoderConfig {
            geocode_endpoint: endpoint.to_string(),
            timeout_secs: 5,
            ..GeocoderConfig::default()
        };
        GoogleGeocoder::new(&config, ApiKey::new(key))
    }

    #[test]
    fn test_refused_connection_is_transport_error_without_key() {
        let geocoder = geocoder_at(&format!("{}/geocode", REFUSED_URL), "secret-key-123");
        match geocoder.geocode("1 main Street, New York, NY, USA") {
            Err(GeocodeError::Transport(msg)) => {
                assert!(!msg.contains("secret-key-123"), "key leaked: {}", msg);
                assert!(!msg.contains("key="), "query leaked: {}", msg);
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_refused_connection_verdict_hides_key() {
        use crate::address::AddressResolver;
        use std::sync::Arc;

        let geocoder = geocoder_at(&format!("{}/geocode", REFUSED_URL), "secret-key-123");
        let verdict = AddressResolver::new(Arc::new(geocoder)).validate("1 main st");
        let error = verdict.error.unwrap();
        assert!(error.starts_with("Validation failed: Failed to geocode address"));
        assert!(!error.contains("secret-key-123"));
    }

    #[test]
    fn test_http_500_without_body_is_upstream() {
        let (base, _) = serve_once("500 Internal Server Error", "oops!");
        let geocoder = geocoder_at(&format!("{}/geocode", base), "k");
        assert_eq!(
            geocoder.geocode("x"),
            Err(GeocodeError::Upstream("HTTP 500".into()))
        );
    }

    #[test]
    fn test_http_error_with_status_body() {
        let (base, _) = serve_once(
            "403 Forbidden",
            r#"{"results": [], "status": "REQUEST_DENIED"}"#,
        );
        let geocoder = geocoder_at(&format!("{}/geocode", base), "k");
        assert_eq!(
            geocoder.geocode("x"),
            Err(GeocodeError::Upstream("REQUEST_DENIED".into()))
        );
    }

    #[test]
    fn test_live_round_trip_sends_query() {
        let (base, requests) = serve_once("200 OK", OK_BODY);
        let geocoder = geocoder_at(&format!("{}/geocode", base), "abc");

        let results = geocoder.geocode("1560 broadway, New York, NY, USA").unwrap();
        assert_eq!(results.len(), 2);

        let request_line = requests.recv().unwrap();
        assert!(request_line.starts_with("GET /geocode?address=1560"));
        assert!(request_line.contains("key=abc"));
    }

    #[test]
    fn test_zero_results_differs_from_transport() {
        let (base, _) = serve_once("200 OK", r#"{"results": [], "status": "ZERO_RESULTS"}"#);
        assert_eq!(geocoder_at(&base, "k").geocode("x"), Ok(vec![]));
        assert!(matches!(
            geocoder_at(REFUSED_URL, "k").geocode("x"),
            Err(GeocodeError::Transport(_))
        ));
    }

    #[test]
    fn test_empty_key_is_rejected_before_request() {
        let geocoder = GoogleGeocoder::new(&GeocoderConfig::default(), ApiKey::new(""));
        assert_eq!(geocoder.geocode("x"), Err(GeocodeError::MissingKey));
    }
}
