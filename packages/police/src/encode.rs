//! Polygon encoding for the police.uk custom-area search.
//!
//! The `poly` parameter is a list of `lat,lng` pairs joined by `:`. Large
//! polygons make the API fail with HTTP 500, so rings are thinned with a
//! simple stride reduction before being sent. Coordinates are fixed to five
//! decimal places (about one metre).

use crime_watch_boundary_models::{GeographicFeature, Position};

use crate::PoliceError;

/// Default maximum number of points sent to the search API.
///
/// The API accepts POST bodies with more points but frequently answers
/// HTTP 500 above ~100; 45 keeps requests reliable.
pub const DEFAULT_MAX_POINTS: usize = 45;

/// Smallest usable point cap (a closed triangle).
pub const MIN_MAX_POINTS: usize = 4;

/// Number of fractional digits per coordinate.
const PRECISION: usize = 5;

/// An encoded `lat,lng:lat,lng` polygon string.
///
/// The first and last points are always identical and the point count
/// never exceeds the encoder's cap.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryString {
    points: Vec<(f64, f64)>,
    encoded: String,
}

impl QueryString {
    /// Returns the encoded string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Returns the `(latitude, longitude)` points in order.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Number of points, including the closing point.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

impl std::fmt::Display for QueryString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// Converts boundary features into bounded, closed query strings.
#[derive(Debug, Clone, Copy)]
pub struct PolygonQueryEncoder {
    max_points: usize,
}

impl Default for PolygonQueryEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS)
    }
}

impl PolygonQueryEncoder {
    /// Creates an encoder with the given point cap.
    ///
    /// Caps below [`MIN_MAX_POINTS`] are raised to it.
    #[must_use]
    pub fn new(max_points: usize) -> Self {
        Self {
            max_points: max_points.max(MIN_MAX_POINTS),
        }
    }

    /// The effective point cap.
    #[must_use]
    pub const fn max_points(&self) -> usize {
        self.max_points
    }

    /// Encodes the outer ring of `feature`.
    ///
    /// Only the first polygon of a multipolygon is used; other parts and
    /// holes are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PoliceError::InvalidGeometry`] if the ring is empty or a
    /// position is not a finite `[lng, lat]` pair.
    pub fn encode(&self, feature: &GeographicFeature) -> Result<QueryString, PoliceError> {
        self.encode_ring(feature.geometry.outer_ring())
    }

    /// Encodes a `GeoJSON` ring of `[lng, lat]` positions.
    ///
    /// # Errors
    ///
    /// Returns [`PoliceError::InvalidGeometry`] if the ring is empty or a
    /// position is not a finite `[lng, lat]` pair.
    pub fn encode_ring(&self, ring: &[Position]) -> Result<QueryString, PoliceError> {
        if ring.is_empty() {
            return Err(PoliceError::InvalidGeometry {
                message: "boundary has no outer ring".to_string(),
            });
        }

        let coords = ring
            .iter()
            .enumerate()
            .map(|(i, position)| match position.as_slice() {
                [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Ok((*lat, *lng)),
                _ => Err(PoliceError::InvalidGeometry {
                    message: format!("position {i} is not a [lng, lat] pair: {position:?}"),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let points = reduce(&coords, self.max_points);
        if points.len() < coords.len() {
            log::debug!(
                "Reduced boundary ring from {} to {} points",
                coords.len(),
                points.len()
            );
        }

        let encoded = points
            .iter()
            .map(|(lat, lng)| format!("{:.PRECISION$},{:.PRECISION$}", lat + 0.0, lng + 0.0))
            .collect::<Vec<_>>()
            .join(":");

        Ok(QueryString { points, encoded })
    }
}

/// Keeps every `k`-th point, `k = ceil(n / cap)`, then closes the ring.
///
/// If closing pushes the count over `cap`, the stride grows until it fits.
fn reduce(coords: &[(f64, f64)], cap: usize) -> Vec<(f64, f64)> {
    let mut step = coords.len().div_ceil(cap).max(1);

    loop {
        let mut kept: Vec<(f64, f64)> = coords.iter().step_by(step).copied().collect();
        close(&mut kept);

        if kept.len() <= cap || step >= coords.len() {
            return kept;
        }
        step += 1;
    }
}

/// Appends the first point if the ring is not already closed.
fn close(points: &mut Vec<(f64, f64)>) {
    if let (Some(&first), Some(&last)) = (points.first(), points.last())
        && first != last
    {
        points.push(first);
    }
}
