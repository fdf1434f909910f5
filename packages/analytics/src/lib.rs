#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory aggregation over a month of street-level incidents.
//!
//! The data set for one parish and one month is small, so everything here
//! works directly on slices of [`IncidentRecord`].

use std::collections::{BTreeSet, HashMap};

use crime_watch_analytics_models::{CategoryCount, CrimeSummary, NO_CATEGORY};
use crime_watch_crime_models::{IncidentRecord, category_label};

/// Category filter value that keeps every incident.
pub const ALL_CATEGORIES: &str = "all";

/// Counts incidents per category.
///
/// Categories are labelled for display and ordered by count, highest
/// first. Equal counts keep the order in which the category first appeared
/// in `records`.
#[must_use]
pub fn summarize(records: &[IncidentRecord]) -> CrimeSummary {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();

    for record in records {
        let slug = record.category.as_str();
        match index.get(slug) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(slug, counts.len());
                counts.push((slug, 1));
            }
        }
    }

    // Stable sort, so ties stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let by_category: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(slug, value)| CategoryCount {
            name: category_label(slug),
            value,
        })
        .collect();

    let most_frequent_category = by_category
        .first()
        .map_or_else(|| NO_CATEGORY.to_string(), |c| c.name.clone());

    log::debug!(
        "Summarized {} incidents across {} categories",
        records.len(),
        by_category.len()
    );

    CrimeSummary {
        total: records.len() as u64,
        by_category,
        most_frequent_category,
    }
}

/// Returns the incidents in `category`, preserving order.
///
/// `None` or [`ALL_CATEGORIES`] keeps every incident.
#[must_use]
pub fn filter_by_category<'a>(
    records: &'a [IncidentRecord],
    category: Option<&str>,
) -> Vec<&'a IncidentRecord> {
    match category {
        None | Some(ALL_CATEGORIES) => records.iter().collect(),
        Some(slug) => records.iter().filter(|r| r.category == slug).collect(),
    }
}

/// Distinct category slugs present in `records`, sorted alphabetically.
#[must_use]
pub fn unique_categories(records: &[IncidentRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, category: &str) -> IncidentRecord {
        IncidentRecord {
            id,
            category: category.to_string(),
            ..IncidentRecord::default()
        }
    }

    fn records(categories: &[&str]) -> Vec<IncidentRecord> {
        categories
            .iter()
            .zip(1..)
            .map(|(category, id)| record(id, category))
            .collect()
    }

    #[test]
    fn summarize_counts_and_labels() {
        let summary = summarize(&records(&[
            "burglary",
            "anti-social-behaviour",
            "anti-social-behaviour",
            "vehicle-crime",
            "anti-social-behaviour",
        ]));

        assert_eq!(summary.total, 5);
        assert_eq!(summary.most_frequent_category, "Anti Social Behaviour");
        assert_eq!(
            summary.by_category[0],
            CategoryCount {
                name: "Anti Social Behaviour".to_string(),
                value: 3
            }
        );
        let total: u64 = summary.by_category.iter().map(|c| c.value).sum();
        assert_eq!(total, summary.total);
    }

    #[test]
    fn summarize_keeps_first_seen_order_on_ties() {
        let summary = summarize(&records(&[
            "vehicle-crime",
            "burglary",
            "shoplifting",
            "burglary",
            "vehicle-crime",
        ]));

        let names: Vec<&str> = summary.by_category.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Vehicle Crime", "Burglary", "Shoplifting"]);
    }

    #[test]
    fn summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary, CrimeSummary::empty());
        assert_eq!(summary.most_frequent_category, "None");
    }

    #[test]
    fn filter_all_keeps_everything() {
        let data = records(&["burglary", "drugs", "burglary"]);
        assert_eq!(filter_by_category(&data, None).len(), 3);
        assert_eq!(filter_by_category(&data, Some("all")).len(), 3);
    }

    #[test]
    fn filter_by_slug_preserves_order() {
        let data = records(&["burglary", "drugs", "burglary", "arson"]);
        let ids: Vec<u64> = filter_by_category(&data, Some("burglary"))
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(filter_by_category(&data, Some("robbery")).is_empty());
    }

    #[test]
    fn unique_categories_sorted_and_distinct() {
        let data = records(&["vehicle-crime", "burglary", "drugs", "burglary"]);
        assert_eq!(
            unique_categories(&data),
            vec!["burglary", "drugs", "vehicle-crime"]
        );
    }
}
