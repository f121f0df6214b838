//! Confidence grading and typo suggestions for a geocoded address.

use super::similarity::similarity;
use super::types::{Assessment, Confidence, GeocodeResult, LocationType};

/// Partial matches scoring below this against the input get a suggestion.
pub const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Grade the primary geocoder result. Rules are checked in order; the first hit wins.
pub fn classify(original_input: &str, primary: &GeocodeResult, is_nyc: bool) -> Assessment {
    if primary.partial_match {
        let score = similarity(
            &original_input.to_lowercase(),
            &primary.formatted_address.to_lowercase(),
        );
        if score < SUGGESTION_THRESHOLD {
            return Assessment {
                suggested_address: Some(primary.formatted_address.clone()),
                confidence: Confidence::Medium,
            };
        }
    }

    let (suggested_address, confidence) = match (primary.location_type, is_nyc) {
        (LocationType::Approximate, true) => {
            (Some(primary.formatted_address.clone()), Confidence::Low)
        }
        (LocationType::Rooftop, true) => (None, Confidence::High),
        (LocationType::RangeInterpolated, true) => (None, Confidence::Medium),
        _ => (None, Confidence::Low),
    };

    Assessment {
        suggested_address,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::types::Coordinates;

    fn result(address: &str, location_type: LocationType, partial_match: bool) -> GeocodeResult {
        GeocodeResult {
            formatted_address: address.to_string(),
            coordinates: Coordinates::new(40.7580, -73.9855),
            location_type,
            partial_match,
        }
    }

    #[test]
    fn test_rooftop_in_nyc_is_high() {
        let r = result("1560 Broadway, New York, NY 10036, USA", LocationType::Rooftop, false);
        let a = classify("1560 broadway", &r, true);
        assert_eq!(a.confidence, Confidence::High);
        assert_eq!(a.suggested_address, None);
    }

    #[test]
    fn test_range_interpolated_in_nyc_is_medium() {
        let r = result("200 Court St, Brooklyn, NY", LocationType::RangeInterpolated, false);
        let a = classify("200 court st", &r, true);
        assert_eq!(a.confidence, Confidence::Medium);
        assert_eq!(a.suggested_address, None);
    }

    #[test]
    fn test_approximate_in_nyc_suggests() {
        let r = result("Queens, NY, USA", LocationType::Approximate, false);
        let a = classify("queens", &r, true);
        assert_eq!(a.confidence, Confidence::Low);
        assert_eq!(a.suggested_address.as_deref(), Some("Queens, NY, USA"));
    }

    #[test]
    fn test_outside_nyc_is_low_without_suggestion() {
        for t in [
            LocationType::Rooftop,
            LocationType::RangeInterpolated,
            LocationType::GeometricCenter,
            LocationType::Approximate,
        ] {
            let r = result("Scranton, PA, USA", t, false);
            let a = classify("scranton", &r, false);
            assert_eq!(a.confidence, Confidence::Low);
            assert_eq!(a.suggested_address, None);
        }
    }

    #[test]
    fn test_geometric_center_in_nyc_is_low() {
        let r = result("Broadway, New York, NY, USA", LocationType::GeometricCenter, false);
        let a = classify("broadway", &r, true);
        assert_eq!(a.confidence, Confidence::Low);
        assert_eq!(a.suggested_address, None);
    }

    #[test]
    fn test_dissimilar_partial_match_suggests_medium() {
        // similarity("abcd", "abzz") == 0.5
        let r = result("ABZZ", LocationType::Rooftop, true);
        let a = classify("abcd", &r, true);
        assert_eq!(a.confidence, Confidence::Medium);
        assert_eq!(a.suggested_address.as_deref(), Some("ABZZ"));
    }

    #[test]
    fn test_similar_partial_match_falls_through() {
        // similarity("abcdefghij", "abcdefghiz") == 0.9
        let r = result("abcdefghiz", LocationType::Rooftop, true);
        let a = classify("ABCDEFGHIJ", &r, true);
        assert_eq!(a.confidence, Confidence::High);
        assert_eq!(a.suggested_address, None);

        let outside = classify("ABCDEFGHIJ", &r, false);
        assert_eq!(outside.confidence, Confidence::Low);
    }

    #[test]
    fn test_partial_match_outside_nyc_still_suggests() {
        let r = result("Main St, Hartford, CT, USA", LocationType::Rooftop, true);
        let a = classify("12 mian", &r, false);
        assert_eq!(a.confidence, Confidence::Medium);
        assert!(a.suggested_address.is_some());
    }
}
