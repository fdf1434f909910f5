#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street-level crime record types for the police.uk data API.
//!
//! Defines the incident records returned by the `crimes-street` endpoints,
//! the `YYYY-MM` reporting period used to select a month of data, and the
//! category taxonomy published by police.uk.

use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Crime categories published by the police.uk street-level API.
///
/// Serialized as the API's kebab-case slugs (e.g. `anti-social-behaviour`).
/// Upstream may introduce new slugs at any time, so [`IncidentRecord`]
/// keeps the raw category string and this enum is only used to recognise
/// known values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CrimeCategory {
    /// Personal, environmental and nuisance anti-social behaviour
    AntiSocialBehaviour,
    /// Theft of a bicycle
    BicycleTheft,
    /// Entering a building to steal or cause damage
    Burglary,
    /// Criminal damage and arson
    CriminalDamageArson,
    /// Possession, supply and production of drugs
    Drugs,
    /// Theft not covered by another category
    OtherTheft,
    /// Possession of a weapon
    PossessionOfWeapons,
    /// Offences which cause fear, alarm or distress
    PublicOrder,
    /// Taking property by force or threat of force
    Robbery,
    /// Theft from shops or stalls
    Shoplifting,
    /// Theft directly from a person
    TheftFromThePerson,
    /// Theft of or from a vehicle, or interference with a vehicle
    VehicleCrime,
    /// Violence and sexual offences
    ViolentCrime,
    /// Crime not covered by another category
    OtherCrime,
}

impl CrimeCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::AntiSocialBehaviour,
            Self::BicycleTheft,
            Self::Burglary,
            Self::CriminalDamageArson,
            Self::Drugs,
            Self::OtherTheft,
            Self::PossessionOfWeapons,
            Self::PublicOrder,
            Self::Robbery,
            Self::Shoplifting,
            Self::TheftFromThePerson,
            Self::VehicleCrime,
            Self::ViolentCrime,
            Self::OtherCrime,
        ]
    }

    /// Returns the human-readable label for this category.
    #[must_use]
    pub fn label(self) -> String {
        category_label(self.as_ref())
    }
}

/// Converts a category slug into a display label.
///
/// Hyphens become spaces and the first letter of every word is
/// uppercased: `"anti-social-behaviour"` becomes `"Anti Social Behaviour"`.
#[must_use]
pub fn category_label(slug: &str) -> String {
    let mut label = String::with_capacity(slug.len());
    let mut at_word_start = true;

    for c in slug.chars() {
        let c = if c == '-' { ' ' } else { c };
        if c.is_alphanumeric() || c == '_' {
            if at_word_start {
                label.extend(c.to_uppercase());
            } else {
                label.push(c);
            }
            at_word_start = false;
        } else {
            label.push(c);
            at_word_start = true;
        }
    }

    label
}

/// A single street-level crime as returned by police.uk.
///
/// Deserialization is lenient: any field missing from the upstream payload,
/// or sent as `null`, falls back to its default instead of rejecting the
/// whole response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentRecord {
    /// Category slug (e.g. `"burglary"`).
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    /// `"Force"` or `"BTP"` (British Transport Police).
    pub location_type: Option<String>,
    /// Anonymised location of the incident.
    #[serde(deserialize_with = "null_as_default")]
    pub location: IncidentLocation,
    /// Extra free-text context (usually empty).
    #[serde(deserialize_with = "null_as_default")]
    pub context: String,
    /// Latest outcome, or `None` when no outcome has been recorded.
    pub outcome_status: Option<OutcomeStatus>,
    /// 64-character identifier that is stable across monthly releases.
    #[serde(deserialize_with = "null_as_default")]
    pub persistent_id: String,
    /// Numeric identifier, unique within one result set.
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    /// Sub-location for BTP incidents (e.g. station name).
    #[serde(deserialize_with = "null_as_default")]
    pub location_subtype: String,
    /// Reporting month in `YYYY-MM` form.
    #[serde(deserialize_with = "null_as_default")]
    pub month: String,
}

impl IncidentRecord {
    /// Returns the known category for this record, if its slug is one
    /// police.uk currently publishes.
    #[must_use]
    pub fn known_category(&self) -> Option<CrimeCategory> {
        CrimeCategory::from_str(&self.category).ok()
    }

    /// Returns the outcome category, or `"Under investigation"` when no
    /// outcome has been recorded yet.
    #[must_use]
    pub fn outcome_label(&self) -> &str {
        self.outcome_status
            .as_ref()
            .map_or("Under investigation", |o| o.category.as_str())
    }

    /// Parses the location into `(latitude, longitude)`.
    ///
    /// Returns `None` if either coordinate is not a valid number.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.location.latitude.trim().parse::<f64>().ok()?;
        let lng = self.location.longitude.trim().parse::<f64>().ok()?;
        Some((lat, lng))
    }
}

/// Snapped location of an incident.
///
/// police.uk encodes coordinates as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentLocation {
    /// Latitude as a decimal string.
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: String,
    /// Longitude as a decimal string.
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: String,
    /// Street the location was snapped to.
    #[serde(deserialize_with = "null_as_default")]
    pub street: Street,
}

/// An anonymised street reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Street {
    /// police.uk street identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    /// Description such as `"On or near High Street"`.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// The most recent outcome recorded for an incident.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeStatus {
    /// Outcome description (e.g. `"Investigation complete; no suspect identified"`).
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    /// Month the outcome was recorded, `YYYY-MM`.
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A calendar month used to select one release of street-level data.
///
/// Parsed from and displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportingPeriod(NaiveDate);

impl ReportingPeriod {
    /// Creates a period for the given year and month (1-12).
    ///
    /// Returns `None` if the month is out of range.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Returns the period containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Returns the period `months` months before this one.
    #[must_use]
    pub fn months_before(self, months: u32) -> Option<Self> {
        self.0.checked_sub_months(Months::new(months)).map(Self)
    }

    /// Calendar year of this period.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Calendar month (1-12) of this period.
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Short British-English label, e.g. `"Mar 2024"`.
    ///
    /// September is abbreviated `"Sept"`, as in `en-GB` locales.
    #[must_use]
    pub fn label(self) -> String {
        if self.month() == 9 {
            return format!("Sept {}", self.year());
        }
        self.0.format("%b %Y").to_string()
    }
}

impl std::fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), self.0.month())
    }
}

impl FromStr for ReportingPeriod {
    type Err = InvalidPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPeriodError {
            value: s.to_string(),
        };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ReportingPeriod {
    type Error = InvalidPeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReportingPeriod> for String {
    fn from(value: ReportingPeriod) -> Self {
        value.to_string()
    }
}

/// Error returned when a string is not a valid `YYYY-MM` period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid reporting period '{value}': expected YYYY-MM")]
pub struct InvalidPeriodError {
    /// The rejected input.
    pub value: String,
}
