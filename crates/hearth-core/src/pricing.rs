//! Weekly pricing allocator
//!
//! Distributes the annual total over the used weeks in proportion to their
//! weights and the occupant's category factor, then rescales the weeks
//! without a revised price so that, together with the revised ones, they
//! still cover the annual total.

use serde::Serialize;
use tracing::debug;

use crate::models::{Category, Person, Week};

/// How a week's category factor was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FactorSource {
    /// Occupant's category was found; its factor applies
    Category,
    /// No [`Person`] with the occupant's name
    PersonNotFound,
    /// The person has no category
    NoCategory,
    /// The person's category does not exist
    CategoryNotFound,
    /// The category exists but its factor is not a finite number
    InvalidFactor,
}

/// Resolve the price factor for a week occupant
///
/// Anything unresolved is neutral (1.0).
pub fn lookup_factor(occupant: &str, people: &[Person], categories: &[Category]) -> (f64, FactorSource) {
    let Some(person) = people.iter().find(|p| p.name == occupant) else {
        return (1.0, FactorSource::PersonNotFound);
    };
    let Some(category_name) = person.category_name.as_deref() else {
        return (1.0, FactorSource::NoCategory);
    };
    match categories.iter().find(|c| c.name == category_name) {
        Some(category) if category.price_factor_percent.is_finite() => (
            category.price_factor_percent.max(0.0) / 100.0,
            FactorSource::Category,
        ),
        Some(_) => (1.0, FactorSource::InvalidFactor),
        None => (1.0, FactorSource::CategoryNotFound),
    }
}

/// Pricing of a single week
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPrice {
    pub index: u32,
    pub used: bool,
    /// Weight after clamping negatives and non-finite values to 0
    pub weight: f64,
    pub category_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor_source: Option<FactorSource>,
    /// Price before reconciliation with revised prices
    pub pre_suggested: f64,
    pub suggested: f64,
    /// Active revised price, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised: Option<f64>,
    /// Price actually charged: the revised price if active, else suggested
    pub real: f64,
}

/// Result of [`compute_weeks_pricing`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeksPricing {
    pub total: f64,
    pub used_week_count: usize,
    pub sum_weights: f64,
    pub base: f64,
    pub sum_revised: f64,
    pub sum_suggested_non_revised: f64,
    pub target_for_non_revised: f64,
    pub scale: f64,
    pub weeks: Vec<WeekPrice>,
}

impl WeeksPricing {
    /// Real prices in week order, one per input week
    pub fn real_by_index(&self) -> Vec<f64> {
        self.weeks.iter().map(|w| w.real).collect()
    }

    /// Sum of real prices over all weeks
    pub fn total_real(&self) -> f64 {
        self.weeks.iter().map(|w| w.real).sum()
    }
}

/// Compute suggested and real prices for every week
pub fn compute_weeks_pricing(
    total: f64,
    weeks: &[Week],
    people: &[Person],
    categories: &[Category],
) -> WeeksPricing {
    let total = if total.is_finite() { total } else { 0.0 };

    let used_week_count = weeks.iter().filter(|w| w.is_used()).count();
    let sum_weights: f64 = weeks
        .iter()
        .filter(|w| w.is_used())
        .map(Week::effective_weight)
        .sum();

    let base = if used_week_count == 0 {
        0.0
    } else if sum_weights > 0.0 {
        total / (sum_weights / 100.0)
    } else {
        total / used_week_count as f64
    };

    let mut prices: Vec<WeekPrice> = weeks
        .iter()
        .map(|week| {
            let weight = week.effective_weight();
            if !week.is_used() {
                return WeekPrice {
                    index: week.index,
                    used: false,
                    weight,
                    category_factor: 1.0,
                    factor_source: None,
                    pre_suggested: 0.0,
                    suggested: 0.0,
                    revised: None,
                    real: 0.0,
                };
            }

            let (factor, source) = lookup_factor(&week.occupant_name, people, categories);
            let base_price = if sum_weights > 0.0 {
                base * (weight / 100.0)
            } else {
                total / used_week_count as f64
            };

            WeekPrice {
                index: week.index,
                used: true,
                weight,
                category_factor: factor,
                factor_source: Some(source),
                pre_suggested: base_price * factor,
                suggested: 0.0,
                revised: week.active_revised_price(),
                real: 0.0,
            }
        })
        .collect();

    let sum_revised: f64 = prices.iter().filter_map(|p| p.revised).sum();
    let sum_suggested_non_revised: f64 = prices
        .iter()
        .filter(|p| p.used && p.revised.is_none())
        .map(|p| p.pre_suggested)
        .sum();
    let target_for_non_revised = (total - sum_revised).max(0.0);
    let scale = if sum_suggested_non_revised > 0.0 {
        target_for_non_revised / sum_suggested_non_revised
    } else {
        0.0
    };

    for price in prices.iter_mut().filter(|p| p.used) {
        match price.revised {
            Some(revised) => {
                price.suggested = price.pre_suggested;
                price.real = revised;
            }
            None => {
                price.suggested = price.pre_suggested * scale;
                price.real = price.suggested;
            }
        }
    }

    debug!(
        total,
        used_week_count, sum_weights, base, sum_revised, scale, "Computed weekly pricing"
    );

    WeeksPricing {
        total,
        used_week_count,
        sum_weights,
        base,
        sum_revised,
        sum_suggested_non_revised,
        target_for_non_revised,
        scale,
        weeks: prices,
    }
}
