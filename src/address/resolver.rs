//! Address resolver: normalize → geocode → borough → confidence → verdict.

use std::sync::Arc;

use tracing::{info, warn};

use super::borough::identify_borough;
use super::classify::classify;
use super::normalize::normalize;
use super::providers::Geocoder;
use super::types::{ResolveError, ValidationVerdict};

/// Stateless validation pipeline. Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct AddressResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl AddressResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Resolve an address, reporting each failure kind separately.
    pub fn resolve(&self, raw_input: &str) -> Result<ValidationVerdict, ResolveError> {
        let query = normalize(raw_input);
        let candidates = self.geocoder.geocode(&query)?;

        let primary = candidates.first().ok_or(ResolveError::NotFound)?;
        let borough = identify_borough(primary.coordinates);
        let is_nyc = borough.is_some();
        let assessment = classify(raw_input, primary, is_nyc);

        Ok(ValidationVerdict {
            is_valid: true,
            is_nyc,
            borough,
            coordinates: Some(primary.coordinates),
            formatted_address: Some(primary.formatted_address.clone()),
            suggested_address: assessment.suggested_address,
            confidence: assessment.confidence,
            error: None,
        })
    }

    /// Validate an address. Never fails: every error becomes an invalid,
    /// low-confidence verdict carrying a readable message.
    pub fn validate(&self, raw_input: &str) -> ValidationVerdict {
        match self.resolve(raw_input) {
            Ok(verdict) => {
                info!(
                    input = raw_input,
                    borough = ?verdict.borough,
                    confidence = %verdict.confidence,
                    suggested = verdict.suggested_address.is_some(),
                    "address validated"
                );
                verdict
            }
            Err(ResolveError::NotFound) => {
                info!(input = raw_input, "address not found");
                ValidationVerdict::failed(ResolveError::NotFound.verdict_message())
            }
            Err(e) => {
                warn!(input = raw_input, error = %e, "validation failed");
                ValidationVerdict::failed(e.verdict_message())
            }
        }
    }
}
