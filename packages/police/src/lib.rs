#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! police.uk street-level crime client.
//!
//! Encodes a boundary polygon into the `poly` query format accepted by the
//! custom-area search, submits the search for one reporting month, and
//! lists the months for which data has been published.
//!
//! The search performs no retries and no recovery: errors are returned to
//! the caller, which decides whether to degrade to an empty incident list.

pub mod encode;
pub mod periods;
pub mod search;

use std::time::Duration;

use crime_watch_boundary_models::GeographicFeature;
use crime_watch_crime_models::{IncidentRecord, InvalidPeriodError, ReportingPeriod};
use thiserror::Error;

pub use encode::{PolygonQueryEncoder, QueryString};

/// Public police.uk API base URL.
pub const DEFAULT_BASE_URL: &str = "https://data.police.uk/api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when talking to police.uk.
#[derive(Debug, Error)]
pub enum PoliceError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The boundary could not be turned into a search polygon.
    #[error("Invalid boundary geometry: {message}")]
    InvalidGeometry {
        /// Description of what was wrong with the geometry.
        message: String,
    },

    /// The crime search answered with a non-success status.
    #[error("police.uk search failed with HTTP {status}: {excerpt}")]
    UpstreamSearch {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        excerpt: String,
    },

    /// The reporting period was not a `YYYY-MM` month.
    #[error("{0}")]
    InvalidPeriod(#[from] InvalidPeriodError),

    /// Any other endpoint answered with a non-success status.
    #[error("police.uk returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
}

/// Client for the police.uk data API.
///
/// Wraps an injected [`reqwest::Client`]; every request carries the
/// configured timeout.
pub struct PoliceClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    encoder: PolygonQueryEncoder,
}

impl PoliceClient {
    /// Creates a client against the public API with default settings.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            encoder: PolygonQueryEncoder::default(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the timeout applied to each individual request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of polygon points sent per search.
    #[must_use]
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.encoder = PolygonQueryEncoder::new(max_points);
        self
    }

    /// Returns the polygon encoder used by this client.
    #[must_use]
    pub const fn encoder(&self) -> &PolygonQueryEncoder {
        &self.encoder
    }

    /// Encodes `feature` into a search polygon.
    ///
    /// # Errors
    ///
    /// Returns [`PoliceError::InvalidGeometry`] if the feature has no usable
    /// outer ring.
    pub fn encode(&self, feature: &GeographicFeature) -> Result<QueryString, PoliceError> {
        self.encoder.encode(feature)
    }

    /// Fetches all crimes inside `query` for `period`.
    ///
    /// # Errors
    ///
    /// See [`search::fetch_incidents`].
    pub async fn fetch_incidents(
        &self,
        query: &QueryString,
        period: ReportingPeriod,
    ) -> Result<Vec<IncidentRecord>, PoliceError> {
        search::fetch_incidents(&self.client, &self.base_url, query, period, self.timeout).await
    }

    /// Fetches all crimes inside `query` for a `YYYY-MM` month string.
    ///
    /// # Errors
    ///
    /// Returns [`PoliceError::InvalidPeriod`] without making a request if
    /// `month` is malformed, otherwise see [`search::fetch_incidents`].
    pub async fn fetch_incidents_for_month(
        &self,
        query: &QueryString,
        month: &str,
    ) -> Result<Vec<IncidentRecord>, PoliceError> {
        let period: ReportingPeriod = month.parse()?;
        self.fetch_incidents(query, period).await
    }

    /// Encodes `feature` and fetches all crimes inside it for `period`.
    ///
    /// Geometry errors are reported before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`PoliceError::InvalidGeometry`] for an unusable boundary,
    /// otherwise see [`search::fetch_incidents`].
    pub async fn fetch_incidents_in(
        &self,
        feature: &GeographicFeature,
        period: ReportingPeriod,
    ) -> Result<Vec<IncidentRecord>, PoliceError> {
        let query = self.encode(feature)?;
        self.fetch_incidents(&query, period).await
    }

    /// Returns the months with published data, newest first.
    ///
    /// Never fails: if the API is unreachable or returns nothing, a
    /// generated list of recent months is returned instead.
    pub async fn available_periods(&self) -> Vec<ReportingPeriod> {
        match periods::fetch_available_periods(&self.client, &self.base_url, self.timeout).await {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => {
                log::warn!("police.uk returned no release dates, using fallback list");
                periods::fallback_periods(chrono::Utc::now().date_naive())
            }
            Err(e) => {
                log::warn!("Error fetching available dates, using fallback list: {e}");
                periods::fallback_periods(chrono::Utc::now().date_naive())
            }
        }
    }
}
