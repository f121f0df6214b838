//! Address validation subsystem.
//!
//! Normalizes free-text input, geocodes it, places the result in a NYC
//! borough, and grades how far the match can be trusted.

pub mod borough;
pub mod classify;
pub mod complaints;
pub mod credentials;
pub mod normalize;
pub mod providers;
pub mod resolver;
pub mod similarity;
pub mod staticmap;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use borough::{identify_borough, BoroughBounds, NYC_BOROUGHS};
pub use complaints::{Complaint, ComplaintsClient, DEFAULT_RADIUS_KM};
pub use credentials::{ApiKey, CredentialError, KeyProvider, KeySource, KeyStore};
pub use normalize::normalize;
pub use providers::{Geocoder, GoogleGeocoder};
pub use resolver::AddressResolver;
pub use staticmap::{MapType, StaticMap};
pub use types::{
    Borough, Confidence, Coordinates, GeocodeError, GeocodeResult, LocationType, ResolveError,
    ValidationVerdict,
};
