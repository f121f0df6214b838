//! Free-text address cleanup before geocoding.

use regex::Regex;
use std::sync::OnceLock;

/// Appended to every query to bias the geocoder toward the city.
pub const CITY_SUFFIX: &str = ", New York, NY, USA";

/// (pattern alternatives, canonical form)
const STREET_SUFFIXES: &[(&str, &str)] = &[
    ("st|street", "Street"),
    ("ave|avenue", "Avenue"),
    ("blvd|boulevard", "Boulevard"),
    ("rd|road", "Road"),
    ("dr|drive", "Drive"),
    ("pl|place", "Place"),
    ("pkwy|parkway", "Parkway"),
];

fn suffix_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        STREET_SUFFIXES
            .iter()
            .filter_map(|(alternatives, canonical)| {
                Regex::new(&format!(r"(?i-u)\b(?:{})\b", alternatives))
                    .ok()
                    .map(|re| (re, *canonical))
            })
            .collect()
    })
}

/// Normalize a raw address into a geocoder query.
///
/// Punctuation becomes whitespace, whitespace runs collapse, street suffixes
/// expand to their canonical spelling, and [`CITY_SUFFIX`] is appended.
/// Total over any input: `""` becomes `", New York, NY, USA"`.
pub fn normalize(raw: &str) -> String {
    let cleaned = raw
        .replace(['.', ','], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut expanded = cleaned;
    for (re, canonical) in suffix_patterns() {
        expanded = re.replace_all(&expanded, *canonical).into_owned();
    }

    expanded.push_str(CITY_SUFFIX);
    expanded
}
