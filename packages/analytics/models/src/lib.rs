#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregated incident counts for one area and reporting month.

use serde::{Deserialize, Serialize};

/// Placeholder shown as the most frequent category when there are no
/// incidents.
pub const NO_CATEGORY: &str = "None";

/// Count of incidents in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Human-readable category label (e.g. "Anti Social Behaviour").
    pub name: String,
    /// Number of incidents.
    pub value: u64,
}

/// Totals and per-category breakdown for a set of incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeSummary {
    /// Total number of incidents.
    pub total: u64,
    /// Categories ordered by count, highest first.
    pub by_category: Vec<CategoryCount>,
    /// Label of the top category, or [`NO_CATEGORY`].
    pub most_frequent_category: String,
}

impl CrimeSummary {
    /// Summary of an empty incident list.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: 0,
            by_category: Vec::new(),
            most_frequent_category: NO_CATEGORY.to_string(),
        }
    }

    /// Returns `true` if no incidents were counted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl Default for CrimeSummary {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let summary = CrimeSummary {
            total: 3,
            by_category: vec![CategoryCount {
                name: "Burglary".to_string(),
                value: 3,
            }],
            most_frequent_category: "Burglary".to_string(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["byCategory"][0]["name"], "Burglary");
        assert_eq!(json["byCategory"][0]["value"], 3);
        assert_eq!(json["mostFrequentCategory"], "Burglary");
    }

    #[test]
    fn empty_summary_has_no_top_category() {
        let summary = CrimeSummary::default();
        assert!(summary.is_empty());
        assert_eq!(summary.most_frequent_category, NO_CATEGORY);
    }
}
