//! Subcommand implementations.

use std::error::Error;

use crime_watch_ai::{Narrator, REPORT_UNAVAILABLE, create_narrator_from_env, generate_report};
use crime_watch_analytics::{ALL_CATEGORIES, filter_by_category, summarize, unique_categories};
use crime_watch_analytics_models::CrimeSummary;
use crime_watch_boundary::{BoundaryResolver, bounding_box, registry};
use crime_watch_boundary_models::{AreaDefinition, ResolvedBoundary};
use crime_watch_crime_models::{CrimeCategory, IncidentRecord, ReportingPeriod, category_label};
use crime_watch_police::PoliceClient;

use crate::config::Config;

type CommandResult = Result<(), Box<dyn Error>>;

/// Shared clients and the selected area.
pub struct Context {
    area: AreaDefinition,
    client: reqwest::Client,
    resolver: BoundaryResolver,
    police: PoliceClient,
}

impl Context {
    /// Builds one HTTP client and the services that share it.
    ///
    /// # Errors
    ///
    /// Returns an error if `area` is not in the registry or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config, area: &str) -> Result<Self, Box<dyn Error>> {
        let area = registry::find_area(area).ok_or_else(|| {
            format!(
                "Unknown area '{area}'. Available: {}",
                registry::area_names().join(", ")
            )
        })?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("crime_watch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let resolver =
            BoundaryResolver::with_registry(client.clone()).with_timeout(config.timeout);

        Ok(Self::from_parts(config, area, client, resolver))
    }

    fn from_parts(
        config: &Config,
        area: AreaDefinition,
        client: reqwest::Client,
        resolver: BoundaryResolver,
    ) -> Self {
        let police = PoliceClient::new(client.clone())
            .with_base_url(config.police_base_url.clone())
            .with_timeout(config.timeout)
            .with_max_points(config.max_points);

        Self {
            area,
            client,
            resolver,
            police,
        }
    }

    async fn period_or_latest(
        &self,
        period: Option<ReportingPeriod>,
    ) -> Result<ReportingPeriod, Box<dyn Error>> {
        if let Some(period) = period {
            return Ok(period);
        }

        let latest = self
            .police
            .available_periods()
            .await
            .first()
            .copied()
            .ok_or("No reporting periods available")?;
        log::info!("Using latest reporting period {latest}");
        Ok(latest)
    }

    async fn fetch(&self, period: ReportingPeriod) -> Result<Vec<IncidentRecord>, Box<dyn Error>> {
        let boundary = self.resolver.resolve(&self.area).await;
        if boundary.is_fallback() {
            eprintln!("Warning: using offline fallback boundary; results cover a bounding box.");
        }
        Ok(self.police.fetch_incidents_in(boundary.feature(), period).await?)
    }
}

/// Prints where the boundary came from and its extent.
pub async fn boundary(ctx: &Context, geojson: bool) -> CommandResult {
    let boundary = ctx.resolver.resolve(&ctx.area).await;

    if geojson {
        let feature = boundary.feature().to_geojson();
        println!("{}", serde_json::to_string_pretty(&feature)?);
        return Ok(());
    }

    println!("Area:     {} ({})", ctx.area.description, ctx.area.code);
    println!("Name:     {}", boundary.name().unwrap_or("(unnamed)"));
    match &boundary {
        ResolvedBoundary::Resolved {
            endpoint, strategy, ..
        } => println!(
            "Source:   {} [{}], matched by {strategy}",
            endpoint.name, endpoint.id
        ),
        ResolvedBoundary::Fallback { .. } => {
            println!("Source:   offline fallback (no boundary service answered)");
        }
    }

    let ring = boundary.feature().geometry.outer_ring();
    println!("Points:   {}", ring.len());
    if let Some(rect) = bounding_box(boundary.feature()) {
        println!(
            "Bounds:   {:.5},{:.5} to {:.5},{:.5} (lng,lat)",
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y
        );
    }

    Ok(())
}

/// Prints the available reporting periods, newest first.
pub async fn periods(ctx: &Context) {
    for period in ctx.police.available_periods().await {
        println!("{period}  {}", period.label());
    }
}

/// Prints the crimes inside the boundary.
pub async fn incidents(
    ctx: &Context,
    period: Option<ReportingPeriod>,
    category: Option<&str>,
    json: bool,
) -> CommandResult {
    check_category(category);
    let period = ctx.period_or_latest(period).await?;
    let records = ctx.fetch(period).await?;
    let shown = filter_by_category(&records, category);

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    for record in &shown {
        println!(
            "{:<12} {:<30} {:<40} {}",
            record.id,
            category_label(&record.category),
            record.location.street.name,
            record.outcome_label()
        );
    }

    let noun = if shown.len() == 1 { "incident" } else { "incidents" };
    println!("\n{} {noun} shown for {}", shown.len(), period.label());
    if shown.len() < records.len() {
        println!("Categories present: {}", unique_categories(&records).join(", "));
    }

    Ok(())
}

/// Prints counts by category.
pub async fn summary(
    ctx: &Context,
    period: Option<ReportingPeriod>,
    category: Option<&str>,
) -> CommandResult {
    check_category(category);
    let period = ctx.period_or_latest(period).await?;
    let records = ctx.fetch(period).await?;

    let selected: Vec<IncidentRecord> = filter_by_category(&records, category)
        .into_iter()
        .cloned()
        .collect();
    print_summary(&ctx.area, period, &summarize(&selected));

    Ok(())
}

/// Fetches, summarizes and narrates one month.
///
/// A failed crime search is reported as an empty month instead of aborting.
pub async fn report(ctx: &Context, period: Option<ReportingPeriod>) -> CommandResult {
    let narrator = match create_narrator_from_env(ctx.client.clone()) {
        Ok(narrator) => Some(narrator),
        Err(e) => {
            log::warn!("No report narrator configured: {e}");
            None
        }
    };

    let text = write_report(ctx, period, narrator.as_deref()).await?;
    println!("{text}");

    Ok(())
}

async fn write_report(
    ctx: &Context,
    period: Option<ReportingPeriod>,
    narrator: Option<&dyn Narrator>,
) -> Result<String, Box<dyn Error>> {
    let period = ctx.period_or_latest(period).await?;
    let records = match ctx.fetch(period).await {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Crime search failed, reporting on no incidents: {e}");
            Vec::new()
        }
    };

    let summary = summarize(&records);
    print_summary(&ctx.area, period, &summary);
    println!();

    let Some(narrator) = narrator else {
        return Ok(REPORT_UNAVAILABLE.to_string());
    };

    Ok(generate_report(
        narrator,
        &ctx.area.description,
        period,
        &summary,
        &records,
    )
    .await)
}

fn print_summary(area: &AreaDefinition, period: ReportingPeriod, summary: &CrimeSummary) {
    println!("{}, {}", area.description, period.label());
    println!("Total crimes:   {}", summary.total);
    println!("Most frequent:  {}", summary.most_frequent_category);

    if summary.is_empty() {
        return;
    }

    println!();
    for count in &summary.by_category {
        println!("{:<32} {:>5}", count.name, count.value);
    }
}

/// Warns about a category filter that police.uk does not publish.
fn check_category(category: Option<&str>) {
    if let Some(slug) = category
        && slug != ALL_CATEGORIES
        && slug.parse::<CrimeCategory>().is_err()
    {
        log::warn!("Unknown category '{slug}'; no incidents are likely to match");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use crime_watch_ai::AiError;
    use mockito::{Matcher, Server};

    use super::*;

    const RELEASES: &str = r#"[
        {"date": "2024-05", "stop-and-search": []},
        {"date": "2024-04", "stop-and-search": []}
    ]"#;

    struct RecordingNarrator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Narrator for RecordingNarrator {
        async fn narrate(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("# Quiet month".to_string())
        }
    }

    /// Context against a stub police.uk whose boundary resolves straight to
    /// the offline fallback.
    fn context(base_url: &str) -> Context {
        let config = Config {
            police_base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
            max_points: 45,
        };
        let client = reqwest::Client::new();
        let resolver = BoundaryResolver::new(client.clone(), Vec::new());
        let area = registry::find_area("codford").unwrap();

        Context::from_parts(&config, area, client, resolver)
    }

    #[tokio::test]
    async fn default_period_is_newest_published() {
        let mut server = Server::new_async().await;
        let dates = server
            .mock("GET", "/crimes-street-dates")
            .with_status(200)
            .with_body(RELEASES)
            .expect(1)
            .create_async()
            .await;

        let ctx = context(&server.url());
        let period = ctx.period_or_latest(None).await.unwrap();

        dates.assert_async().await;
        assert_eq!(period.to_string(), "2024-05");
    }

    #[tokio::test]
    async fn explicit_period_skips_release_lookup() {
        let mut server = Server::new_async().await;
        let dates = server
            .mock("GET", "/crimes-street-dates")
            .expect(0)
            .create_async()
            .await;

        let ctx = context(&server.url());
        let wanted: ReportingPeriod = "2023-11".parse().unwrap();
        let period = ctx.period_or_latest(Some(wanted)).await.unwrap();

        dates.assert_async().await;
        assert_eq!(period, wanted);
    }

    #[tokio::test]
    async fn report_survives_failed_search() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/crimes-street-dates")
            .with_status(200)
            .with_body(RELEASES)
            .create_async()
            .await;
        let search = server
            .mock("POST", "/crimes-street/all-crime")
            .match_body(Matcher::UrlEncoded("date".into(), "2024-05".into()))
            .with_status(500)
            .with_body("Server Error")
            .expect(1)
            .create_async()
            .await;

        let ctx = context(&server.url());
        let narrator = RecordingNarrator {
            prompts: Mutex::new(Vec::new()),
        };
        let text = write_report(&ctx, None, Some(&narrator)).await.unwrap();

        search.assert_async().await;
        assert_eq!(text, "# Quiet month");
        let prompts = narrator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Total Crimes: 0"));
        assert!(prompts[0].contains("- Most Frequent Category: None"));
        assert!(prompts[0].contains("report for 2024-05"));
    }

    #[tokio::test]
    async fn report_without_narrator_is_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/crimes-street/all-crime")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let ctx = context(&server.url());
        let period = "2024-03".parse().ok();
        let text = write_report(&ctx, period, None).await.unwrap();

        assert_eq!(text, REPORT_UNAVAILABLE);
    }
}
