//! Borough lookup by bounding box.
//!
//! The boxes are rectangles, not borough polygons, and several overlap.
//! Lookup walks the table in order and the first containing box wins.

use super::types::{Borough, Coordinates};

/// A borough and its lat/lon bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoroughBounds {
    pub borough: Borough,
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoroughBounds {
    /// Inclusive on every edge.
    pub fn contains(&self, coords: Coordinates) -> bool {
        coords.lat >= self.south
            && coords.lat <= self.north
            && coords.lng >= self.west
            && coords.lng <= self.east
    }
}

/// Lookup order is significant: Manhattan, Brooklyn, Queens, The Bronx, Staten Island.
pub const NYC_BOROUGHS: [BoroughBounds; 5] = [
    BoroughBounds {
        borough: Borough::Manhattan,
        north: 40.8820, south: 40.6892, east: -73.9442, west: -74.0479,
    },
    BoroughBounds {
        borough: Borough::Brooklyn,
        north: 40.7394, south: 40.5707, east: -73.8336, west: -74.0421,
    },
    BoroughBounds {
        borough: Borough::Queens,
        north: 40.8007, south: 40.5431, east: -73.7004, west: -73.9626,
    },
    BoroughBounds {
        borough: Borough::TheBronx,
        north: 40.9176, south: 40.7854, east: -73.7658, west: -73.9339,
    },
    BoroughBounds {
        borough: Borough::StatenIsland,
        north: 40.6514, south: 40.4960, east: -74.0340, west: -74.2591,
    },
];

/// The first borough whose box contains `coords`, if any.
pub fn identify_borough(coords: Coordinates) -> Option<Borough> {
    NYC_BOROUGHS
        .iter()
        .find(|b| b.contains(coords))
        .map(|b| b.borough)
}
