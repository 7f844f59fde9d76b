//! Default simulation settings
//!
//! Defaults are loaded from a TOML file. Resolution order:
//! 1. an explicit path, if given and present
//! 2. the user override at `<data_dir>/hearth/config/defaults.toml`
//! 3. the defaults embedded in the binary

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::calendar::build_weeks_for_year;
use crate::coerce::{self, clamp, clamp_year, finite};
use crate::error::{Error, Result};
use crate::models::{Category, Charge, ChargeKind, Participant, Person, Snapshot};

/// Embedded default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../config/defaults.toml");

/// Defaults used to seed new snapshots and fill gaps in imported ones
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub purchase_price: Option<f64>,
    pub amort_years: Option<f64>,
    /// Weight given to freshly built weeks
    pub week_weight: f64,
    pub participants: Vec<Participant>,
    pub charges: Vec<Charge>,
    pub categories: Vec<Category>,
    /// Empty means one person per participant, in the first category
    pub people: Vec<Person>,
}

impl Defaults {
    /// Load from the user override location, falling back to the embedded defaults
    pub fn load() -> Result<Self> {
        load_defaults(None)
    }

    /// Load from an explicit path, falling back to the embedded defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        load_defaults(Some(path))
    }

    /// The defaults compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Parse defaults from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawDefaults = toml::from_str(content)?;

        let charges = raw
            .charges
            .unwrap_or_default()
            .into_iter()
            .map(|c| {
                let kind = match c.kind.as_deref() {
                    None => ChargeKind::Recurring,
                    Some(kind) => kind.parse::<ChargeKind>().map_err(Error::Config)?,
                };
                Ok(Charge {
                    name: c.name.unwrap_or_default(),
                    kind,
                    amount: finite(c.amount),
                    total: finite(c.total),
                    years: finite(c.years),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            purchase_price: finite(raw.purchase_price),
            amort_years: finite(raw.amort_years),
            week_weight: raw
                .week_weight
                .map_or(coerce::DEFAULT_WEEK_WEIGHT, |w| {
                    clamp(w, 0.0, coerce::MAX_PERCENT_FACTOR)
                }),
            participants: raw
                .participants
                .unwrap_or_default()
                .into_iter()
                .map(|p| Participant {
                    name: p.name.unwrap_or_default(),
                    ownership_percent: clamp(p.percent.unwrap_or(0.0), 0.0, 100.0),
                    loan_cost: clamp(p.loan_cost.unwrap_or(0.0), 0.0, f64::MAX),
                })
                .collect(),
            charges,
            categories: raw
                .categories
                .unwrap_or_default()
                .into_iter()
                .map(|c| Category {
                    name: c.name.unwrap_or_default(),
                    price_factor_percent: clamp(
                        c.factor_pct.unwrap_or(100.0),
                        0.0,
                        coerce::MAX_PERCENT_FACTOR,
                    ),
                })
                .collect(),
            people: raw
                .people
                .unwrap_or_default()
                .into_iter()
                .map(|p| Person {
                    name: p.name.unwrap_or_default(),
                    category_name: p.category.filter(|c| !c.is_empty()),
                })
                .collect(),
        })
    }

    /// Name of the first category, assigned to people without one
    pub fn first_category(&self) -> Option<&str> {
        self.categories.first().map(|c| c.name.as_str())
    }

    /// Build a fresh snapshot for `year`
    pub fn snapshot(&self, year: i32) -> Snapshot {
        let year = clamp_year(year);
        let people = if self.people.is_empty() {
            self.participants
                .iter()
                .map(|p| Person::new(&p.name, self.first_category()))
                .collect()
        } else {
            self.people.clone()
        };

        Snapshot {
            purchase_price: self.purchase_price,
            amort_years: self.amort_years,
            participants: self.participants.clone(),
            charges: self.charges.clone(),
            year,
            weeks: build_weeks_for_year(year, None, self.week_weight),
            categories: self.categories.clone(),
            people,
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self::embedded().unwrap_or_else(|_| Self {
            purchase_price: None,
            amort_years: None,
            week_weight: coerce::DEFAULT_WEEK_WEIGHT,
            participants: Vec::new(),
            charges: Vec::new(),
            categories: Vec::new(),
            people: Vec::new(),
        })
    }
}

/// Default override path for the defaults file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("hearth").join("config").join("defaults.toml"))
}

fn load_defaults(explicit: Option<&Path>) -> Result<Defaults> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            debug!("Loading defaults from {}", path.display());
            fs::read_to_string(&path)?
        }
        Some(path) => {
            if explicit.is_some() {
                warn!(
                    "Defaults file {} not found, using built-in defaults",
                    path.display()
                );
            }
            DEFAULT_CONFIG.to_string()
        }
        None => DEFAULT_CONFIG.to_string(),
    };

    Defaults::parse(&content)
}

/// Raw defaults structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawDefaults {
    purchase_price: Option<f64>,
    amort_years: Option<f64>,
    week_weight: Option<f64>,
    participants: Option<Vec<RawParticipant>>,
    charges: Option<Vec<RawCharge>>,
    categories: Option<Vec<RawCategory>>,
    people: Option<Vec<RawPerson>>,
}

#[derive(Debug, Deserialize)]
struct RawParticipant {
    name: Option<String>,
    percent: Option<f64>,
    loan_cost: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCharge {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    amount: Option<f64>,
    total: Option<f64>,
    years: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    name: Option<String>,
    factor_pct: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPerson {
    name: Option<String>,
    category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_defaults_parse() {
        let defaults = Defaults::embedded().unwrap();
        assert_eq!(defaults.purchase_price, Some(500_000.0));
        assert_eq!(defaults.amort_years, Some(25.0));
        assert_eq!(defaults.week_weight, 100.0);
        assert_eq!(defaults.participants.len(), 3);
        let pct: f64 = defaults.participants.iter().map(|p| p.ownership_percent).sum();
        assert_eq!(pct, 100.0);
        assert_eq!(defaults.categories.len(), 4);
        assert_eq!(defaults.first_category(), Some("Owners"));
        assert!(defaults.charges.iter().all(|c| c.kind == ChargeKind::Recurring));
    }

    #[test]
    fn test_snapshot_creates_people_for_participants() {
        let defaults = Defaults::embedded().unwrap();
        let snapshot = defaults.snapshot(2020);
        assert_eq!(snapshot.year, 2020);
        assert_eq!(snapshot.weeks.len(), 53);
        assert_eq!(snapshot.people.len(), 3);
        assert!(snapshot
            .people
            .iter()
            .all(|p| p.category_name.as_deref() == Some("Owners")));
    }

    #[test]
    fn test_snapshot_clamps_year() {
        let snapshot = Defaults::embedded().unwrap().snapshot(3000);
        assert_eq!(snapshot.year, coerce::MAX_YEAR);
    }

    #[test]
    fn test_parse_clamps_values() {
        let defaults = Defaults::parse(
            r#"
            week_weight = 5000

            [[participants]]
            name = "A"
            percent = 140
            loan_cost = -3

            [[categories]]
            name = "Free"
            factor_pct = -20

            [[people]]
            name = "Bob"
            category = "Free"
            "#,
        )
        .unwrap();

        assert_eq!(defaults.week_weight, 1000.0);
        assert_eq!(defaults.participants[0].ownership_percent, 100.0);
        assert_eq!(defaults.participants[0].loan_cost, 0.0);
        assert_eq!(defaults.categories[0].price_factor_percent, 0.0);
        assert_eq!(defaults.purchase_price, None);

        let snapshot = defaults.snapshot(2024);
        assert_eq!(snapshot.people, vec![Person::new("Bob", Some("Free"))]);
    }

    #[test]
    fn test_parse_rejects_unknown_charge_type() {
        let result = Defaults::parse(
            r#"
            [[charges]]
            name = "Odd"
            type = "monthly"
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_rejects_invalid_toml() {
        assert!(matches!(
            Defaults::parse("purchase_price = ["),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_load_from_unreadable_path() {
        // A directory exists but cannot be read as a file
        let dir = TempDir::new().unwrap();
        assert!(matches!(Defaults::load_from(dir.path()), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("defaults.toml");
        fs::write(&path, "purchase_price = 100000\namort_years = 10\n").unwrap();

        let defaults = Defaults::load_from(&path).unwrap();
        assert_eq!(defaults.purchase_price, Some(100_000.0));
        assert!(defaults.participants.is_empty());
    }

    #[test]
    fn test_load_from_missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let defaults = Defaults::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(defaults, Defaults::embedded().unwrap());
    }
}
