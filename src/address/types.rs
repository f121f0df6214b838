//! Core types for the address subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// One of the five boroughs of New York City.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Borough {
    Manhattan,
    Brooklyn,
    Queens,
    #[serde(rename = "The Bronx")]
    TheBronx,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Borough {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Manhattan => "Manhattan",
            Self::Brooklyn => "Brooklyn",
            Self::Queens => "Queens",
            Self::TheBronx => "The Bronx",
            Self::StatenIsland => "Staten Island",
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How precisely the geocoder pinned the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Rooftop,
    RangeInterpolated,
    GeometricCenter,
    Approximate,
}

/// A single candidate returned by the geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub coordinates: Coordinates,
    pub location_type: LocationType,
    /// The provider could not match the full input.
    pub partial_match: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Output of the confidence classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub suggested_address: Option<String>,
    pub confidence: Confidence,
}

/// The resolver's answer for one input address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    pub is_valid: bool,
    #[serde(rename = "isNYC")]
    pub is_nyc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borough: Option<Borough>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_address: Option<String>,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationVerdict {
    /// An invalid, low-confidence verdict carrying only an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            is_nyc: false,
            borough: None,
            coordinates: None,
            formatted_address: None,
            suggested_address: None,
            confidence: Confidence::Low,
            error: Some(error.into()),
        }
    }

    pub fn summary_line(&self) -> String {
        if let Some(err) = &self.error {
            return format!("\u{274C} {}", err);
        }
        let address = self.formatted_address.as_deref().unwrap_or("(unknown)");
        match self.borough {
            Some(borough) => format!(
                "\u{2713} {} [{}] confidence={}",
                address, borough, self.confidence
            ),
            None => format!("\u{26A0} Not a NYC address: {}", address),
        }
    }
}

/// Failures at the geocoding gateway boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("Geocoding API error: {0}")]
    Upstream(String),

    #[error("Failed to geocode address: {0}")]
    Transport(String),

    #[error("Invalid geocoding response: {0}")]
    InvalidResponse(String),

    #[error("No geocoding API key available")]
    MissingKey,
}

/// Why an address could not be resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Address not found")]
    NotFound,

    #[error("Geocoding API error: {0}")]
    UpstreamFailure(String),

    #[error("Failed to geocode address: {0}")]
    TransportFailure(String),

    #[error("{0}")]
    Unclassified(String),
}

impl From<GeocodeError> for ResolveError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::Upstream(status) => Self::UpstreamFailure(status),
            GeocodeError::Transport(msg) => Self::TransportFailure(msg),
            other @ (GeocodeError::InvalidResponse(_) | GeocodeError::MissingKey) => {
                Self::Unclassified(other.to_string())
            }
        }
    }
}

impl ResolveError {
    /// The message placed in a failed verdict.
    pub fn verdict_message(&self) -> String {
        match self {
            Self::NotFound => self.to_string(),
            other => format!("Validation failed: {}", other),
        }
    }
}
