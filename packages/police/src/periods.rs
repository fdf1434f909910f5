//! Available street-level data releases.
//!
//! See <https://data.police.uk/docs/method/crimes-street-dates/>

use std::time::Duration;

use chrono::NaiveDate;
use crime_watch_crime_models::ReportingPeriod;
use serde::Deserialize;

use crate::PoliceError;

/// Number of months in the fallback period list.
pub const FALLBACK_MONTHS: u32 = 12;

/// Months between today and the newest fallback period. police.uk usually
/// publishes a month's data about two months later.
pub const PUBLICATION_LAG_MONTHS: u32 = 2;

#[derive(Deserialize)]
struct DateEntry {
    date: String,
}

/// Fetches the list of months with published street-level data, newest
/// first.
///
/// Entries that are not valid `YYYY-MM` months are skipped.
///
/// # Errors
///
/// Returns [`PoliceError`] if the request fails, the API answers with a
/// non-success status, or the body cannot be parsed.
pub async fn fetch_available_periods(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> Result<Vec<ReportingPeriod>, PoliceError> {
    let url = format!("{}/crimes-street-dates", base_url.trim_end_matches('/'));

    let resp = client.get(&url).timeout(timeout).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(PoliceError::Status {
            status: status.as_u16(),
        });
    }

    let body = resp.text().await?;
    let entries: Vec<DateEntry> = serde_json::from_str(&body)?;

    Ok(entries
        .iter()
        .filter_map(|entry| match entry.date.parse() {
            Ok(period) => Some(period),
            Err(e) => {
                log::debug!("Skipping unparseable release date: {e}");
                None
            }
        })
        .collect())
}

/// Returns [`FALLBACK_MONTHS`] consecutive periods, newest first, starting
/// [`PUBLICATION_LAG_MONTHS`] months before `today`.
#[must_use]
pub fn fallback_periods(today: NaiveDate) -> Vec<ReportingPeriod> {
    let current = ReportingPeriod::containing(today);

    (PUBLICATION_LAG_MONTHS..PUBLICATION_LAG_MONTHS + FALLBACK_MONTHS)
        .filter_map(|months| current.months_before(months))
        .collect()
}
