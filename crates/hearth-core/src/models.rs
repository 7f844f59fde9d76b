//! Domain models for Hearth
//!
//! Field names on the wire follow the snapshot document format written by
//! the browser simulator (`percent`, `factorPct`, `who`, `dates`, ...), so
//! files saved by either side load in the other unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce;

/// How a charge contributes to the annual cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChargeKind {
    /// Paid every year: contributes `amount`
    #[default]
    Recurring,
    /// One-off expense spread over `years`: contributes `total / years`
    Amortized,
    /// Unrecognized kind in an imported document; contributes nothing
    #[serde(other)]
    Unknown,
}

impl ChargeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recurring => "recurring",
            Self::Amortized => "amortized",
            Self::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for ChargeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recurring" => Ok(Self::Recurring),
            "amortized" | "amortised" => Ok(Self::Amortized),
            _ => Err(format!("Unknown charge kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ChargeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A yearly or amortized cost of owning the property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Charge {
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ChargeKind,
    /// Yearly amount (recurring charges)
    #[serde(
        default,
        deserialize_with = "coerce::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    /// Full cost to spread (amortized charges)
    #[serde(
        default,
        deserialize_with = "coerce::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<f64>,
    /// Spreading duration (amortized charges)
    #[serde(
        default,
        deserialize_with = "coerce::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub years: Option<f64>,
}

impl Charge {
    pub fn recurring(name: &str, amount: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: ChargeKind::Recurring,
            amount: Some(amount),
            total: None,
            years: None,
        }
    }

    pub fn amortized(name: &str, total: f64, years: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: ChargeKind::Amortized,
            amount: None,
            total: Some(total),
            years: Some(years),
        }
    }
}

/// A co-owner sharing the cost of the property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    /// Ownership share in percent (0-100). Never normalized across participants.
    #[serde(
        rename = "percent",
        alias = "ownershipPercent",
        default,
        deserialize_with = "coerce::number_or_zero"
    )]
    pub ownership_percent: f64,
    /// Yearly cost of this participant's own loan
    #[serde(default, deserialize_with = "coerce::number_or_zero")]
    pub loan_cost: f64,
}

impl Participant {
    pub fn new(name: &str, ownership_percent: f64, loan_cost: f64) -> Self {
        Self {
            name: name.to_string(),
            ownership_percent,
            loan_cost,
        }
    }
}

/// A pricing category for week occupants (owners, family, external renters, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    /// Multiplicative price adjustment in percent; 100 is neutral
    #[serde(
        rename = "factorPct",
        alias = "priceFactorPercent",
        default = "neutral_factor",
        deserialize_with = "coerce::factor_percent"
    )]
    pub price_factor_percent: f64,
}

fn neutral_factor() -> f64 {
    100.0
}

impl Category {
    pub fn new(name: &str, price_factor_percent: f64) -> Self {
        Self {
            name: name.to_string(),
            price_factor_percent,
        }
    }
}

/// Someone who can occupy a week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    /// Name of the person's [`Category`]; may be unset or dangling
    #[serde(
        default,
        deserialize_with = "coerce::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_name: Option<String>,
}

impl Person {
    pub fn new(name: &str, category_name: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            category_name: category_name.map(String::from),
        }
    }
}

/// One ISO week of the accounting year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    /// 1-based position in the year
    #[serde(default, deserialize_with = "coerce::index")]
    pub index: u32,
    /// Display label (`S01`..`S53`)
    #[serde(default, deserialize_with = "coerce::string")]
    pub label: String,
    /// Display range, Monday to Sunday (`DD/MM – DD/MM`)
    #[serde(rename = "dates", default, deserialize_with = "coerce::string")]
    pub date_range: String,
    /// Occupying [`Person`] name; empty means the week is unused
    #[serde(rename = "who", default, deserialize_with = "coerce::string")]
    pub occupant_name: String,
    /// Relative occupancy weight in percent
    #[serde(default = "default_weight", deserialize_with = "coerce::weight")]
    pub weight: f64,
    /// Manual price override, honored only when finite and > 0
    #[serde(
        default,
        deserialize_with = "coerce::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub revised_price: Option<f64>,
}

fn default_weight() -> f64 {
    coerce::DEFAULT_WEEK_WEIGHT
}

impl Week {
    /// Whether someone occupies this week
    pub fn is_used(&self) -> bool {
        !self.occupant_name.trim().is_empty()
    }

    /// Weight used for pricing: negative or non-finite weights count as 0
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() {
            self.weight.max(0.0)
        } else {
            0.0
        }
    }

    /// The revised price, if it is active (finite and > 0)
    pub fn active_revised_price(&self) -> Option<f64> {
        self.revised_price.filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// Everything the allocation engine needs, as held by the caller
///
/// This is also the persisted document format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Purchase price of the property; unset is distinct from 0
    #[serde(
        default,
        deserialize_with = "coerce::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_price: Option<f64>,
    /// Amortization duration of the purchase, in years
    #[serde(
        default,
        deserialize_with = "coerce::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amort_years: Option<f64>,
    #[serde(default, deserialize_with = "coerce::list")]
    pub participants: Vec<Participant>,
    #[serde(default, deserialize_with = "coerce::list")]
    pub charges: Vec<Charge>,
    #[serde(default, deserialize_with = "coerce::year")]
    pub year: i32,
    #[serde(default, deserialize_with = "coerce::positional_list")]
    pub weeks: Vec<Week>,
    #[serde(default, deserialize_with = "coerce::list")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "coerce::list")]
    pub people: Vec<Person>,
}

impl Snapshot {
    pub fn find_person(&self, name: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.name == name)
    }
}

/// A named configuration in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    pub name: String,
    pub snapshot: Snapshot,
    /// Incremented on every save; used for optimistic concurrency
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing entry for a named configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub name: String,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}
