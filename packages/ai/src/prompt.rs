//! Report prompt construction.

use crime_watch_analytics_models::CrimeSummary;
use crime_watch_crime_models::{IncidentRecord, ReportingPeriod};

/// Number of raw incidents included as a sample in the prompt.
pub const SAMPLE_SIZE: usize = 10;

/// Builds the analyst prompt for one area and month.
///
/// Includes the totals, the per-category breakdown, and a JSON sample of
/// the first [`SAMPLE_SIZE`] incidents with their street and outcome.
#[must_use]
pub fn build_report_prompt(
    area: &str,
    period: ReportingPeriod,
    summary: &CrimeSummary,
    records: &[IncidentRecord],
) -> String {
    let breakdown = summary
        .by_category
        .iter()
        .map(|c| format!("- {}: {}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("\n");

    let sample = serde_json::Value::Array(
        records
            .iter()
            .take(SAMPLE_SIZE)
            .map(|r| {
                serde_json::json!({
                    "category": r.category,
                    "street": r.location.street.name,
                    "outcome": r.outcome_label(),
                })
            })
            .collect(),
    );

    format!(
        "You are a crime analyst for the Civil Parish of {area}.\n\
         Generate a professional, concise, yet detailed monthly crime report for {period}.\n\
         \n\
         Data Summary:\n\
         - Total Crimes: {total}\n\
         - Most Frequent Category: {top}\n\
         \n\
         Breakdown by Category:\n\
         {breakdown}\n\
         \n\
         Notable Incidents (Raw Data Sample):\n\
         {sample}\n\
         \n\
         Instructions:\n\
         1. Write a headline summarizing the month's safety status.\n\
         2. Provide a narrative overview of the trends.\n\
         3. Highlight specific areas (streets) if they appear frequently in the raw data.\n\
         4. Conclude with community safety advice based on the types of crimes \
         (e.g., if burglary is high, suggest locking doors).\n\
         5. Format with Markdown.\n\
         6. Keep the tone objective but reassuring where possible.\n",
        total = summary.total,
        top = summary.most_frequent_category,
    )
}
