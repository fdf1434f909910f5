//! Static offline boundary.

use crime_watch_boundary_models::{AreaDefinition, BoundaryGeometry, GeographicFeature};

/// Suffix appended to the area name on the fallback feature.
pub const FALLBACK_NAME_SUFFIX: &str = "(Offline Fallback)";

/// Builds the approximate bounding-box polygon for `area`.
///
/// The ring is closed and wound counter-clockwise starting at the
/// south-west corner.
#[must_use]
pub fn fallback_feature(area: &AreaDefinition) -> GeographicFeature {
    let bounds = &area.fallback;

    let ring = vec![
        vec![bounds.min_lon, bounds.min_lat],
        vec![bounds.max_lon, bounds.min_lat],
        vec![bounds.max_lon, bounds.max_lat],
        vec![bounds.min_lon, bounds.max_lat],
        vec![bounds.min_lon, bounds.min_lat],
    ];

    let mut properties = serde_json::Map::new();
    properties.insert(
        bounds.name_field.clone(),
        serde_json::Value::String(format!("{} {FALLBACK_NAME_SUFFIX}", area.name)),
    );
    properties.insert(
        bounds.code_field.clone(),
        serde_json::Value::String(area.code.clone()),
    );

    GeographicFeature {
        properties,
        geometry: BoundaryGeometry::Polygon(vec![ring]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codford_fallback_is_closed_bbox() {
        let area = crate::registry::find_area("codford").unwrap();
        let feature = fallback_feature(&area);

        assert_eq!(
            feature.property_str("PAR23NM"),
            Some("Codford (Offline Fallback)")
        );
        assert_eq!(feature.property_str("PAR23CD"), Some("E04011682"));

        let ring = feature.geometry.outer_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring[0], vec![-2.085, 51.135]);
        assert_eq!(ring[2], vec![-2.025, 51.185]);
    }
}
