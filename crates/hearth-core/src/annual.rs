//! Annual cost calculator
//!
//! Turns the purchase price, its amortization duration and the list of
//! charges into the yearly budget the weekly prices must cover.

use serde::Serialize;

use crate::coerce::finite;
use crate::models::{Charge, ChargeKind};

/// Yearly cost of the property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnnualCost {
    /// Purchase price spread over the amortization duration
    pub amort_annual: f64,
    /// Sum of the yearly contributions of all charges
    pub charges_annual: f64,
    pub total: f64,
}

/// Yearly contribution of a single charge
///
/// Missing or invalid fields make the charge contribute 0.
pub fn charge_annual_value(charge: &Charge) -> f64 {
    match charge.kind {
        ChargeKind::Recurring => finite(charge.amount).map_or(0.0, |a| a.max(0.0)),
        ChargeKind::Amortized => match (finite(charge.total), finite(charge.years)) {
            (Some(total), Some(years)) if years > 0.0 => total.max(0.0) / years,
            _ => 0.0,
        },
        ChargeKind::Unknown => 0.0,
    }
}

/// Compute the annual cost of the property
pub fn compute_annual(
    purchase_price: Option<f64>,
    amort_years: Option<f64>,
    charges: &[Charge],
) -> AnnualCost {
    let amort_annual = match (finite(purchase_price), finite(amort_years)) {
        (Some(price), Some(years)) if years > 0.0 => price.max(0.0) / years,
        _ => 0.0,
    };
    let charges_annual: f64 = charges.iter().map(charge_annual_value).sum();

    AnnualCost {
        amort_annual,
        charges_annual,
        total: amort_annual + charges_annual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_amortization() {
        let annual = compute_annual(Some(500_000.0), Some(25.0), &[]);
        assert_eq!(annual.amort_annual, 20_000.0);
        assert_eq!(annual.charges_annual, 0.0);
        assert_eq!(annual.total, 20_000.0);
    }

    #[test]
    fn test_unset_or_zero_years_gives_no_amortization() {
        assert_eq!(compute_annual(Some(500_000.0), None, &[]).amort_annual, 0.0);
        assert_eq!(compute_annual(Some(500_000.0), Some(0.0), &[]).amort_annual, 0.0);
        assert_eq!(compute_annual(Some(500_000.0), Some(-5.0), &[]).amort_annual, 0.0);
        assert_eq!(compute_annual(None, Some(25.0), &[]).amort_annual, 0.0);
        assert_eq!(
            compute_annual(Some(f64::NAN), Some(25.0), &[]).amort_annual,
            0.0
        );
    }

    #[test]
    fn test_negative_price_clamped() {
        assert_eq!(compute_annual(Some(-1000.0), Some(10.0), &[]).amort_annual, 0.0);
    }

    #[test]
    fn test_charge_values() {
        assert_eq!(charge_annual_value(&Charge::recurring("Water", 600.0)), 600.0);
        assert_eq!(charge_annual_value(&Charge::recurring("Refund", -50.0)), 0.0);
        assert_eq!(
            charge_annual_value(&Charge::amortized("Roof", 20_000.0, 10.0)),
            2_000.0
        );
        assert_eq!(
            charge_annual_value(&Charge::amortized("Roof", 20_000.0, 0.0)),
            0.0
        );
        assert_eq!(
            charge_annual_value(&Charge::amortized("Roof", -20_000.0, 10.0)),
            0.0
        );
    }

    #[test]
    fn test_charge_missing_fields() {
        let mut charge = Charge::recurring("Water", 0.0);
        charge.amount = None;
        assert_eq!(charge_annual_value(&charge), 0.0);

        let mut charge = Charge::amortized("Roof", 20_000.0, 10.0);
        charge.years = None;
        assert_eq!(charge_annual_value(&charge), 0.0);

        let mut charge = Charge::recurring("Odd", 100.0);
        charge.kind = ChargeKind::Unknown;
        assert_eq!(charge_annual_value(&charge), 0.0);
    }

    #[test]
    fn test_total_sums_everything() {
        let charges = vec![
            Charge::recurring("Water", 600.0),
            Charge::recurring("Electricity", 900.0),
            Charge::amortized("Roof", 20_000.0, 10.0),
        ];
        let annual = compute_annual(Some(500_000.0), Some(25.0), &charges);
        assert_eq!(annual.charges_annual, 3_500.0);
        assert_eq!(annual.total, 23_500.0);
    }
}
