//! Custom-area street-level crime search.
//!
//! See <https://data.police.uk/docs/method/crime-street/>

use std::time::Duration;

use crime_watch_crime_models::{IncidentRecord, ReportingPeriod};

use crate::PoliceError;
use crate::encode::QueryString;

/// Maximum number of characters of an error body kept for diagnostics.
pub const EXCERPT_LEN: usize = 200;

/// Fetches all street-level crimes inside `query` for `period`.
///
/// Sends a single form-encoded POST to `{base_url}/crimes-street/all-crime`.
/// Records are returned in the order the API supplied them, without any
/// validation beyond JSON decoding. No retry is attempted.
///
/// # Errors
///
/// Returns [`PoliceError::UpstreamSearch`] with the status code and a body
/// excerpt if the API answers with a non-success status,
/// [`PoliceError::Http`] if the request itself fails, or
/// [`PoliceError::Json`] if the body is not a JSON array of incidents.
pub async fn fetch_incidents(
    client: &reqwest::Client,
    base_url: &str,
    query: &QueryString,
    period: ReportingPeriod,
    timeout: Duration,
) -> Result<Vec<IncidentRecord>, PoliceError> {
    let url = format!("{}/crimes-street/all-crime", base_url.trim_end_matches('/'));
    let date = period.to_string();

    log::debug!(
        "Searching {period} crimes within {} points",
        query.point_count()
    );

    let resp = client
        .post(&url)
        .form(&[("poly", query.as_str()), ("date", date.as_str())])
        .timeout(timeout)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        // The API sometimes answers with a full HTML page; keep it short.
        let excerpt = resp
            .text()
            .await
            .map(|body| excerpt(&body))
            .unwrap_or_default();
        log::warn!("police.uk search for {period} failed with {status}: {excerpt}");
        return Err(PoliceError::UpstreamSearch {
            status: status.as_u16(),
            excerpt,
        });
    }

    let body = resp.text().await?;
    let incidents: Vec<IncidentRecord> = serde_json::from_str(&body)?;

    log::info!("Fetched {} incidents for {period}", incidents.len());

    Ok(incidents)
}

/// Returns at most [`EXCERPT_LEN`] characters of `body`.
fn excerpt(body: &str) -> String {
    body.trim().chars().take(EXCERPT_LEN).collect()
}
