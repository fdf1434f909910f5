#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative boundary types.
//!
//! Defines the TOML schema for the area being monitored and for the
//! `ArcGIS` boundary endpoints that can supply its polygon, plus the
//! resolved feature type handed to the rest of the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single `[longitude, latitude]` position (extra ordinates ignored).
pub type Position = geojson::Position;

/// An ordered sequence of positions describing one polygon edge.
pub type Ring = Vec<Position>;

/// The administrative area to resolve, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaDefinition {
    /// Official area code (ONS GSS code, e.g. `"E04011682"`).
    pub code: String,
    /// Exact display name used by the boundary services (e.g. `"Codford"`).
    pub name: String,
    /// Human-readable description (e.g. `"Codford, Wiltshire"`).
    pub description: String,
    /// Static polygon used when every endpoint fails.
    pub fallback: FallbackBoundary,
}

/// Approximate bounding box used as the offline boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackBoundary {
    /// Western edge (longitude).
    pub min_lon: f64,
    /// Southern edge (latitude).
    pub min_lat: f64,
    /// Eastern edge (longitude).
    pub max_lon: f64,
    /// Northern edge (latitude).
    pub max_lat: f64,
    /// Property key the fallback feature stores its name under.
    pub name_field: String,
    /// Property key the fallback feature stores its code under.
    pub code_field: String,
}

/// One candidate boundary service, deserialized from TOML.
///
/// Endpoints are tried in ascending `priority` order; newer boundary
/// vintages carry lower values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Unique identifier (e.g., `"2023-bgc-map"`).
    pub id: String,
    /// Human-readable layer name.
    pub name: String,
    /// Try order; lower values are queried first.
    pub priority: u32,
    /// `ArcGIS` layer query URL (up to `.../query`).
    pub url: String,
    /// Attribute names used to match the area.
    pub fields: EndpointFields,
}

/// Attribute names for one boundary vintage (e.g. `PAR23CD` / `PAR23NM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointFields {
    /// Attribute holding the official area code.
    pub code: String,
    /// Attribute holding the area display name.
    pub name: String,
}

/// Polygon geometry of a boundary feature.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    /// A single polygon: outer ring followed by any holes.
    Polygon(Vec<Ring>),
    /// Several polygons, each an outer ring followed by any holes.
    MultiPolygon(Vec<Vec<Ring>>),
}

impl BoundaryGeometry {
    /// Returns the ring used for downstream queries.
    ///
    /// This is the outer ring of a `Polygon`, or the outer ring of the
    /// *first* polygon of a `MultiPolygon`. Other parts and interior holes
    /// are ignored, so a multi-part boundary is only partially covered.
    /// Returns an empty slice when the geometry has no rings.
    #[must_use]
    pub fn outer_ring(&self) -> &[Position] {
        let rings = match self {
            Self::Polygon(rings) => rings.as_slice(),
            Self::MultiPolygon(polygons) => polygons.first().map_or(&[][..], Vec::as_slice),
        };
        rings.first().map_or(&[][..], Vec::as_slice)
    }
}

/// A boundary polygon with its attribute map.
///
/// Constructed once by the resolver and treated as read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GeographicFeature {
    /// Feature attributes (name and code fields vary by vintage).
    pub properties: serde_json::Map<String, serde_json::Value>,
    /// Polygon or multipolygon geometry.
    pub geometry: BoundaryGeometry,
}

impl GeographicFeature {
    /// Returns a string property, if present.
    #[must_use]
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(serde_json::Value::as_str)
    }

    /// Converts this feature into a standard `GeoJSON` feature.
    #[must_use]
    pub fn to_geojson(&self) -> geojson::Feature {
        let value = match &self.geometry {
            BoundaryGeometry::Polygon(rings) => geojson::Value::Polygon(rings.clone()),
            BoundaryGeometry::MultiPolygon(polygons) => {
                geojson::Value::MultiPolygon(polygons.clone())
            }
        };

        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(value)),
            id: None,
            properties: Some(self.properties.clone()),
            foreign_members: None,
        }
    }
}

impl TryFrom<geojson::Feature> for GeographicFeature {
    type Error = UnsupportedGeometryError;

    fn try_from(feature: geojson::Feature) -> Result<Self, Self::Error> {
        let geometry = match feature.geometry.map(|g| g.value) {
            Some(geojson::Value::Polygon(rings)) => BoundaryGeometry::Polygon(rings),
            Some(geojson::Value::MultiPolygon(polygons)) => {
                BoundaryGeometry::MultiPolygon(polygons)
            }
            Some(other) => {
                return Err(UnsupportedGeometryError {
                    geometry_type: geometry_type_name(&other).to_string(),
                });
            }
            None => {
                return Err(UnsupportedGeometryError {
                    geometry_type: "null".to_string(),
                });
            }
        };

        Ok(Self {
            properties: feature.properties.unwrap_or_default(),
            geometry,
        })
    }
}

const fn geometry_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Error returned when a feature's geometry is not a polygon or
/// multipolygon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported boundary geometry '{geometry_type}': expected Polygon or MultiPolygon")]
pub struct UnsupportedGeometryError {
    /// The `GeoJSON` geometry type that was found.
    pub geometry_type: String,
}

/// How a boundary was matched at an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Matched on the official area code.
    Code,
    /// Matched on the exact area name.
    Name,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code => write!(f, "code"),
            Self::Name => write!(f, "name"),
        }
    }
}

/// Outcome of boundary resolution.
///
/// Resolution never fails: when every endpoint is exhausted the static
/// fallback polygon is returned as [`ResolvedBoundary::Fallback`], so
/// callers can tell degraded mode apart without inspecting properties.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedBoundary {
    /// A live feature returned by one of the boundary services.
    Resolved {
        /// The matched feature.
        feature: GeographicFeature,
        /// The endpoint that supplied it.
        endpoint: EndpointDescriptor,
        /// Whether it matched by code or by name.
        strategy: MatchStrategy,
    },
    /// The static offline bounding box.
    Fallback {
        /// The fallback feature, named with an `(Offline Fallback)` suffix.
        feature: GeographicFeature,
        /// Property key holding the fallback name.
        name_field: String,
    },
}

impl ResolvedBoundary {
    /// Returns the boundary feature regardless of where it came from.
    #[must_use]
    pub const fn feature(&self) -> &GeographicFeature {
        match self {
            Self::Resolved { feature, .. } | Self::Fallback { feature, .. } => feature,
        }
    }

    /// Consumes the result, returning the feature.
    #[must_use]
    pub fn into_feature(self) -> GeographicFeature {
        match self {
            Self::Resolved { feature, .. } | Self::Fallback { feature, .. } => feature,
        }
    }

    /// Returns `true` if this is the offline fallback.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Returns the feature's display name using the field appropriate to
    /// its source.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Resolved {
                feature, endpoint, ..
            } => feature.property_str(&endpoint.fields.name),
            Self::Fallback {
                feature,
                name_field,
            } => feature.property_str(name_field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]
    }

    #[test]
    fn outer_ring_of_polygon_is_first_ring() {
        let hole = vec![vec![0.2, 0.2], vec![0.4, 0.2], vec![0.2, 0.4], vec![0.2, 0.2]];
        let geometry = BoundaryGeometry::Polygon(vec![square(), hole]);
        assert_eq!(geometry.outer_ring(), square().as_slice());
    }

    #[test]
    fn outer_ring_of_multipolygon_uses_first_part_only() {
        let other = vec![vec![5.0, 5.0], vec![6.0, 5.0], vec![6.0, 6.0], vec![5.0, 5.0]];
        let geometry = BoundaryGeometry::MultiPolygon(vec![vec![square()], vec![other]]);
        assert_eq!(geometry.outer_ring(), square().as_slice());
    }

    #[test]
    fn outer_ring_of_empty_geometry_is_empty() {
        assert!(BoundaryGeometry::Polygon(vec![]).outer_ring().is_empty());
        assert!(BoundaryGeometry::MultiPolygon(vec![]).outer_ring().is_empty());
        assert!(
            BoundaryGeometry::MultiPolygon(vec![vec![]])
                .outer_ring()
                .is_empty()
        );
    }

    #[test]
    fn converts_from_geojson_polygon() {
        let json = serde_json::json!({
            "type": "Feature",
            "properties": { "PAR23NM": "Codford", "PAR23CD": "E04011682" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
            }
        });
        let feature = serde_json::from_value::<geojson::Feature>(json).unwrap();
        let feature = GeographicFeature::try_from(feature).unwrap();

        assert_eq!(feature.property_str("PAR23NM"), Some("Codford"));
        assert_eq!(feature.geometry.outer_ring(), square().as_slice());

        let back = feature.to_geojson();
        assert!(matches!(
            back.geometry.map(|g| g.value),
            Some(geojson::Value::Polygon(_))
        ));
    }

    #[test]
    fn rejects_non_polygon_geometry() {
        let json = serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
        });
        let feature = serde_json::from_value::<geojson::Feature>(json).unwrap();
        let err = GeographicFeature::try_from(feature).unwrap_err();
        assert_eq!(err.geometry_type, "Point");
        assert_eq!(
            err.to_string(),
            "unsupported boundary geometry 'Point': expected Polygon or MultiPolygon"
        );
    }

    #[test]
    fn endpoint_descriptor_parses_from_toml() {
        let endpoint: EndpointDescriptor = toml::de::from_str(
            r#"
            id = "2023-bgc"
            name = "Parishes (December 2023) Boundaries EW BGC"
            priority = 20
            url = "https://example.com/query"

            [fields]
            code = "PAR23CD"
            name = "PAR23NM"
            "#,
        )
        .unwrap();
        assert_eq!(endpoint.fields.code, "PAR23CD");
        assert_eq!(endpoint.priority, 20);
    }
}
