#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parish boundary resolution.
//!
//! Resolves a fixed administrative area to its boundary polygon by trying
//! a prioritized list of ONS `ArcGIS` layers, newest boundary vintage
//! first. Each layer is queried by official area code and then by exact
//! name; the first hit wins. If every layer fails the static bounding box
//! from the area definition is returned instead, so resolution itself
//! never fails.
//!
//! Endpoints and areas are defined as TOML files embedded at compile time
//! (see [`registry`]).

pub mod arcgis;
pub mod fallback;
pub mod registry;

use std::time::Duration;

use crime_watch_boundary_models::{
    AreaDefinition, EndpointDescriptor, GeographicFeature, MatchStrategy, ResolvedBoundary,
    UnsupportedGeometryError,
};
use geo::BoundingRect;
use thiserror::Error;

/// Default per-request timeout for boundary queries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from a single boundary query.
///
/// These never escape [`BoundaryResolver::resolve`]; they only decide
/// whether the resolver moves on to the next strategy or endpoint.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Boundary service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Server answered 200 with an embedded error payload.
    #[error("Boundary service error: {message}")]
    Application {
        /// Message from the error payload.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The feature collection was empty.
    #[error("No matching features")]
    EmptyResult,

    /// The first feature was not a polygon or multipolygon.
    #[error("{0}")]
    UnsupportedGeometry(#[from] UnsupportedGeometryError),
}

/// Resolves an area to its boundary feature.
///
/// Holds an injected HTTP client and an immutable endpoint list. Endpoints
/// are tried strictly one at a time in list order.
pub struct BoundaryResolver {
    client: reqwest::Client,
    endpoints: Vec<EndpointDescriptor>,
    timeout: Duration,
}

impl BoundaryResolver {
    /// Creates a resolver over `endpoints`, tried in the given order.
    #[must_use]
    pub fn new(client: reqwest::Client, endpoints: Vec<EndpointDescriptor>) -> Self {
        Self {
            client,
            endpoints,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a resolver over every registered endpoint.
    #[must_use]
    pub fn with_registry(client: reqwest::Client) -> Self {
        Self::new(client, registry::all_endpoints())
    }

    /// Sets the timeout applied to each individual request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the endpoints in the order they are tried.
    #[must_use]
    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    /// Resolves `area` to a boundary feature.
    ///
    /// For each endpoint, first matches the code field against the area
    /// code, then the name field against the exact area name. Any failure
    /// (transport, status, embedded error, empty result) moves on to the
    /// next attempt. Returns [`ResolvedBoundary::Fallback`] once every
    /// endpoint is exhausted.
    pub async fn resolve(&self, area: &AreaDefinition) -> ResolvedBoundary {
        log::info!(
            "Starting boundary search for {} ({}) across {} endpoints",
            area.name,
            area.code,
            self.endpoints.len()
        );

        for endpoint in &self.endpoints {
            let attempts = [
                (
                    MatchStrategy::Code,
                    arcgis::where_equals(&endpoint.fields.code, &area.code),
                ),
                (
                    MatchStrategy::Name,
                    arcgis::where_equals(&endpoint.fields.name, &area.name),
                ),
            ];

            for (strategy, where_clause) in attempts {
                match arcgis::query_feature(&self.client, &endpoint.url, &where_clause, self.timeout)
                    .await
                {
                    Ok(feature) => {
                        log::info!("Found boundary in {} using {strategy}", endpoint.id);
                        return ResolvedBoundary::Resolved {
                            feature,
                            endpoint: endpoint.clone(),
                            strategy,
                        };
                    }
                    Err(BoundaryError::Application { message }) => {
                        log::warn!("{}: boundary service returned error: {message}", endpoint.id);
                    }
                    Err(e) => {
                        log::debug!("{}: {strategy} query failed: {e}", endpoint.id);
                    }
                }
            }
        }

        log::error!(
            "All {} boundary endpoints failed for {}. Using fallback boundary.",
            self.endpoints.len(),
            area.name
        );

        ResolvedBoundary::Fallback {
            feature: fallback::fallback_feature(area),
            name_field: area.fallback.name_field.clone(),
        }
    }
}

/// Returns the bounding rectangle of the feature's outer ring.
///
/// Used to fit a map view to the boundary. Returns `None` for an empty
/// ring. Positions with fewer than two ordinates are skipped.
#[must_use]
pub fn bounding_box(feature: &GeographicFeature) -> Option<geo::Rect<f64>> {
    let coords: Vec<(f64, f64)> = feature
        .geometry
        .outer_ring()
        .iter()
        .filter_map(|p| Some((*p.first()?, *p.get(1)?)))
        .collect();

    geo::LineString::from(coords).bounding_rect()
}
