//! Compile-time registry of monitored areas and boundary endpoints.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new boundary vintage requires creating a TOML file in
//! `endpoints/` and adding a corresponding entry here.

use crime_watch_boundary_models::{AreaDefinition, EndpointDescriptor};

/// Number of registered boundary endpoints. Enforced by a test.
#[cfg(test)]
const EXPECTED_ENDPOINT_COUNT: usize = 6;

/// Embedded endpoint definitions, one per boundary vintage.
const ENDPOINT_TOMLS: &[(&str, &str)] = &[
    ("par24_may_bgc", include_str!("../endpoints/par24_may_bgc.toml")),
    ("par23_dec_bgc", include_str!("../endpoints/par23_dec_bgc.toml")),
    (
        "par23_dec_bgc_map",
        include_str!("../endpoints/par23_dec_bgc_map.toml"),
    ),
    ("par23_dec_bfc", include_str!("../endpoints/par23_dec_bfc.toml")),
    ("par22_dec_bgc", include_str!("../endpoints/par22_dec_bgc.toml")),
    ("par21_dec_bgc", include_str!("../endpoints/par21_dec_bgc.toml")),
];

/// Embedded area definitions.
const AREA_TOMLS: &[(&str, &str)] = &[("codford", include_str!("../areas/codford.toml"))];

/// Returns all boundary endpoints, sorted by priority (newest vintage
/// first).
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_endpoints() -> Vec<EndpointDescriptor> {
    let mut endpoints: Vec<EndpointDescriptor> = ENDPOINT_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse boundary endpoint '{name}': {e}"))
        })
        .collect();
    endpoints.sort_by_key(|e| e.priority);
    endpoints
}

/// Returns the names of all registered areas.
#[must_use]
pub fn area_names() -> Vec<&'static str> {
    AREA_TOMLS.iter().map(|(name, _)| *name).collect()
}

/// Looks up an area definition by registry name (e.g. `"codford"`).
///
/// # Panics
///
/// Panics if the matching embedded TOML file fails to parse.
#[must_use]
pub fn find_area(name: &str) -> Option<AreaDefinition> {
    AREA_TOMLS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(n, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse area definition '{n}': {e}"))
        })
}
