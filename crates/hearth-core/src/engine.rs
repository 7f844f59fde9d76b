//! Allocation engine entry point
//!
//! Runs the annual cost calculator, the weekly allocator and the settlement
//! over a [`Snapshot`], in that order.

use serde::Serialize;

use crate::annual::{compute_annual, AnnualCost};
use crate::models::Snapshot;
use crate::pricing::{compute_weeks_pricing, WeeksPricing};
use crate::settlement::{compute_participant_settlement, SettlementSummary};

/// Full report for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub year: i32,
    pub annual: AnnualCost,
    pub pricing: WeeksPricing,
    pub settlement: SettlementSummary,
}

/// Simulate a snapshot
pub fn simulate(snapshot: &Snapshot) -> Simulation {
    let annual = compute_annual(
        snapshot.purchase_price,
        snapshot.amort_years,
        &snapshot.charges,
    );
    let pricing = compute_weeks_pricing(
        annual.total,
        &snapshot.weeks,
        &snapshot.people,
        &snapshot.categories,
    );
    let settlement = compute_participant_settlement(
        annual.total,
        &snapshot.participants,
        &snapshot.weeks,
        &pricing.real_by_index(),
    );

    Simulation {
        year: snapshot.year,
        annual,
        pricing,
        settlement,
    }
}
