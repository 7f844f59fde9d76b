//! Participant settlement
//!
//! Each participant owes their ownership share of the annual total plus
//! their own loan cost, and is credited their ownership share of every real
//! weekly price paid, whoever paid it.

use serde::Serialize;
use tracing::{debug, warn};

use crate::coerce::clamp;
use crate::models::{Participant, Week};

/// Tolerance when checking that ownership percentages sum to 100
const OWNERSHIP_TOLERANCE: f64 = 1e-9;

/// Settlement of a single participant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSettlement {
    pub name: String,
    /// Ownership percent after clamping to [0, 100]
    pub ownership_percent: f64,
    /// Ownership share of the annual total
    pub share: f64,
    pub loan_cost: f64,
    /// Real prices of the weeks this participant occupied
    pub self_paid: f64,
    /// Ownership share of all real weekly prices
    pub rent_revenue: f64,
    /// Rent revenue minus what the participant paid for their own weeks
    pub net_revenue: f64,
    /// `(share + loan_cost) - rent_revenue`
    pub net: f64,
}

/// Column sums across all participants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettlementTotals {
    pub ownership_percent: f64,
    pub share: f64,
    pub loan_cost: f64,
    pub self_paid: f64,
    pub rent_revenue: f64,
    pub net_revenue: f64,
    pub net: f64,
}

/// Result of [`compute_participant_settlement`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    pub participants: Vec<ParticipantSettlement>,
    pub totals: SettlementTotals,
    /// Sum of all real weekly prices
    pub total_real: f64,
    /// Ownership percentages do not sum to 100. Figures are not normalized.
    pub ownership_warning: bool,
}

/// Compute every participant's settlement
///
/// `real_by_index` holds the real price of each week in the same order as
/// `weeks`, as produced by
/// [`WeeksPricing::real_by_index`](crate::pricing::WeeksPricing::real_by_index).
/// Weeks past the end of `real_by_index` have no price.
pub fn compute_participant_settlement(
    total: f64,
    participants: &[Participant],
    weeks: &[Week],
    real_by_index: &[f64],
) -> SettlementSummary {
    let total = if total.is_finite() { total } else { 0.0 };
    let total_real: f64 = real_by_index.iter().filter(|v| v.is_finite()).sum();

    let settlements: Vec<ParticipantSettlement> = participants
        .iter()
        .map(|p| {
            let pct = clamp(p.ownership_percent, 0.0, 100.0);
            let loan_cost = clamp(p.loan_cost, 0.0, f64::MAX);
            let share = total * (pct / 100.0);
            let self_paid: f64 = weeks
                .iter()
                .zip(real_by_index)
                .filter(|(w, real)| w.is_used() && w.occupant_name == p.name && real.is_finite())
                .map(|(_, real)| real)
                .sum();
            let rent_revenue = total_real * (pct / 100.0);

            ParticipantSettlement {
                name: p.name.clone(),
                ownership_percent: pct,
                share,
                loan_cost,
                self_paid,
                rent_revenue,
                net_revenue: rent_revenue - self_paid,
                net: (share + loan_cost) - rent_revenue,
            }
        })
        .collect();

    let totals = settlements
        .iter()
        .fold(SettlementTotals::default(), |acc, s| SettlementTotals {
            ownership_percent: acc.ownership_percent + s.ownership_percent,
            share: acc.share + s.share,
            loan_cost: acc.loan_cost + s.loan_cost,
            self_paid: acc.self_paid + s.self_paid,
            rent_revenue: acc.rent_revenue + s.rent_revenue,
            net_revenue: acc.net_revenue + s.net_revenue,
            net: acc.net + s.net,
        });

    let ownership_warning = (totals.ownership_percent - 100.0).abs() > OWNERSHIP_TOLERANCE;
    if ownership_warning {
        warn!(
            sum = totals.ownership_percent,
            "Ownership percentages do not sum to 100%"
        );
    }

    debug!(
        participants = settlements.len(),
        total_real,
        net = totals.net,
        "Computed participant settlement"
    );

    SettlementSummary {
        participants: settlements,
        totals,
        total_real,
        ownership_warning,
    }
}
