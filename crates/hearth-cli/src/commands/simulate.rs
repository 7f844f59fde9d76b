//! Simulation and calendar commands

use std::path::Path;

use anyhow::{bail, Context, Result};
use hearth_core::{
    calendar::build_weeks_for_year, coerce::clamp_year, simulate, snapshot::import_document,
    Defaults, Simulation, Snapshot,
};

use super::{current_year, open_db, truncate};

/// Resolve the snapshot to simulate: a file, a stored configuration, or the defaults
pub fn load_snapshot(
    db_path: &Path,
    defaults: &Defaults,
    file: Option<&Path>,
    config: Option<&str>,
) -> Result<Snapshot> {
    match (file, config) {
        (Some(file), _) => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            import_document(&text, defaults, current_year())
                .with_context(|| format!("Failed to import {}", file.display()))
        }
        (None, Some(name)) => {
            let db = open_db(db_path)?;
            match db.get_config(name)? {
                Some(snapshot) => Ok(snapshot),
                None => bail!("Configuration '{}' not found", name),
            }
        }
        (None, None) => Ok(defaults.snapshot(current_year())),
    }
}

pub fn cmd_simulate(
    db_path: &Path,
    defaults: &Defaults,
    file: Option<&Path>,
    config: Option<&str>,
    json: bool,
) -> Result<()> {
    let snapshot = load_snapshot(db_path, defaults, file, config)?;
    let simulation = simulate(&snapshot);

    if json {
        println!("{}", serde_json::to_string_pretty(&simulation)?);
    } else {
        print_simulation(&snapshot, &simulation);
    }
    Ok(())
}

fn print_simulation(snapshot: &Snapshot, sim: &Simulation) {
    println!("🏠 Simulation for {}", sim.year);
    println!();
    println!("💰 Annual cost");
    println!("   ─────────────────────────────");
    println!("   Amortization:   {:>12.2}", sim.annual.amort_annual);
    println!("   Charges:        {:>12.2}", sim.annual.charges_annual);
    println!("   Total:          {:>12.2}", sim.annual.total);

    println!();
    println!(
        "📅 Weeks ({} used of {})",
        sim.pricing.used_week_count,
        sim.pricing.weeks.len()
    );
    println!("   ─────────────────────────────────────────────────────────────");
    if sim.pricing.used_week_count == 0 {
        println!("   No week assigned yet.");
    }
    for (week, price) in snapshot
        .weeks
        .iter()
        .zip(&sim.pricing.weeks)
        .filter(|(_, p)| p.used)
    {
        let revised = if price.revised.is_some() { " ✏️" } else { "" };
        println!(
            "   {:<4} {:<15} {:<20} {:>6.0}% ×{:<5.2} {:>12.2}{}",
            week.label,
            week.date_range,
            truncate(&week.occupant_name, 20),
            price.weight,
            price.category_factor,
            price.real,
            revised
        );
    }
    println!("   Total real prices: {:.2}", sim.pricing.total_real());

    println!();
    println!("👥 Settlement");
    println!("   ──────────────────────────────────────────────────────────────────────────");
    println!(
        "   {:<16} {:>6} {:>12} {:>10} {:>12} {:>12} {:>12}",
        "Participant", "%", "Share", "Loan", "Self-paid", "Rent rev.", "Net"
    );
    for p in &sim.settlement.participants {
        println!(
            "   {:<16} {:>6.1} {:>12.2} {:>10.2} {:>12.2} {:>12.2} {:>12.2}",
            truncate(&p.name, 16),
            p.ownership_percent,
            p.share,
            p.loan_cost,
            p.self_paid,
            p.rent_revenue,
            p.net
        );
    }
    let t = &sim.settlement.totals;
    println!(
        "   {:<16} {:>6.1} {:>12.2} {:>10.2} {:>12.2} {:>12.2} {:>12.2}",
        "Total", t.ownership_percent, t.share, t.loan_cost, t.self_paid, t.rent_revenue, t.net
    );

    if sim.settlement.ownership_warning {
        println!();
        println!(
            "⚠️  Ownership percentages sum to {:.1}%, not 100%. Figures are not normalized.",
            t.ownership_percent
        );
    }
}

pub fn cmd_calendar(year: Option<i32>, defaults: &Defaults) -> Result<()> {
    let year = clamp_year(year.unwrap_or_else(current_year));
    let weeks = build_weeks_for_year(year, None, defaults.week_weight);

    println!("📅 {} has {} ISO weeks", year, weeks.len());
    println!("   ─────────────────────────────");
    for week in &weeks {
        println!("   {}  {}", week.label, week.date_range);
    }
    Ok(())
}
