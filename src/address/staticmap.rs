//! Static map image URLs for a validated location.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::credentials::ApiKey;
use super::types::Coordinates;

pub const DEFAULT_ZOOM: u8 = 16;
pub const MIN_VIEW_ZOOM: u8 = 10;
pub const MAX_VIEW_ZOOM: u8 = 20;
const ZOOM_STEP: u8 = 2;
const POI_STYLE: &str = "feature:poi|visibility:simplified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Roadmap,
    Satellite,
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roadmap => write!(f, "roadmap"),
            Self::Satellite => write!(f, "satellite"),
        }
    }
}

impl FromStr for MapType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "roadmap" => Ok(Self::Roadmap),
            "satellite" => Ok(Self::Satellite),
            _ => Err(format!("Unknown map type '{}'. Use 'roadmap' or 'satellite'.", s)),
        }
    }
}

/// One static map view centered on a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticMap {
    pub center: Coordinates,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub map_type: MapType,
    /// Simplify points of interest. Set on the first view only.
    pub simplify_poi: bool,
}

impl StaticMap {
    /// The initial 400x300 roadmap view at zoom 16.
    pub fn new(center: Coordinates) -> Self {
        Self {
            center,
            zoom: DEFAULT_ZOOM,
            width: 400,
            height: 300,
            map_type: MapType::Roadmap,
            simplify_poi: true,
        }
    }

    pub fn zoom_in(self) -> Self {
        Self {
            zoom: self.zoom.saturating_add(ZOOM_STEP).min(MAX_VIEW_ZOOM),
            simplify_poi: false,
            ..self
        }
    }

    pub fn zoom_out(self) -> Self {
        Self {
            zoom: self.zoom.saturating_sub(ZOOM_STEP).max(MIN_VIEW_ZOOM),
            simplify_poi: false,
            ..self
        }
    }

    /// Jump straight to `zoom`. Only the initial zoom keeps the POI style.
    pub fn with_zoom(self, zoom: u8) -> Self {
        Self {
            zoom,
            simplify_poi: self.simplify_poi && zoom == DEFAULT_ZOOM,
            ..self
        }
    }

    pub fn with_map_type(self, map_type: MapType) -> Self {
        Self {
            map_type,
            simplify_poi: false,
            ..self
        }
    }

    pub fn url(&self, endpoint: &str, key: &ApiKey) -> Result<Url, url::ParseError> {
        let center = self.center.to_string();
        let markers = format!("color:red|size:mid|{}", center);
        let mut params = vec![
            ("center", center),
            ("zoom", self.zoom.to_string()),
            ("size", format!("{}x{}", self.width, self.height)),
            ("maptype", self.map_type.to_string()),
            ("markers", markers),
        ];
        if self.simplify_poi {
            params.push(("style", POI_STYLE.to_string()));
        }
        params.push(("key", key.expose().to_string()));
        Url::parse_with_params(endpoint, &params)
    }
}
