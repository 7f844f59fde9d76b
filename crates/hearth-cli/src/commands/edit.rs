//! Configuration edit commands
//!
//! Every edit loads the stored snapshot, applies one change and saves it
//! back against the loaded version.

use anyhow::{bail, Result};
use hearth_core::{ChargeKind, Database, Defaults, Snapshot};

fn edit_config<F>(db: &Database, name: &str, edit: F) -> Result<Snapshot>
where
    F: FnOnce(&mut Snapshot) -> Result<String>,
{
    let Some(entry) = db.get_config_entry(name)? else {
        bail!("Configuration '{}' not found", name);
    };

    let mut snapshot = entry.snapshot;
    let message = edit(&mut snapshot)?;
    let version = db.save_config(name, &snapshot, Some(entry.version))?;

    println!("✅ {} ('{}' version {})", message, name, version);
    Ok(snapshot)
}

pub fn cmd_edit_year(db: &Database, defaults: &Defaults, name: &str, year: i32) -> Result<()> {
    edit_config(db, name, |s| {
        s.change_year(year, defaults.week_weight);
        Ok(format!("Switched to {} ({} weeks)", s.year, s.weeks.len()))
    })?;
    Ok(())
}

pub fn cmd_edit_assign(db: &Database, name: &str, week: u32, who: Option<&str>) -> Result<()> {
    edit_config(db, name, |s| {
        let who = who.unwrap_or("");
        s.assign_week(week, who)?;
        let who = who.trim();
        Ok(if who.is_empty() {
            format!("Freed week {}", week)
        } else if s.find_person(who).is_none() {
            format!(
                "Assigned week {} to {} (not a known person, priced at factor 1.0)",
                week, who
            )
        } else {
            format!("Assigned week {} to {}", week, who)
        })
    })?;
    Ok(())
}

pub fn cmd_edit_weight(db: &Database, name: &str, week: u32, weight: f64) -> Result<()> {
    edit_config(db, name, |s| {
        s.set_week_weight(week, weight)?;
        Ok(format!("Set week {} weight", week))
    })?;
    Ok(())
}

pub fn cmd_edit_revise(db: &Database, name: &str, week: u32, price: Option<f64>) -> Result<()> {
    edit_config(db, name, |s| {
        s.revise_week(week, price)?;
        Ok(match price {
            Some(price) => format!("Revised week {} to {:.2}", week, price),
            None => format!("Cleared revised price of week {}", week),
        })
    })?;
    Ok(())
}

pub fn cmd_edit_add_participant(db: &Database, name: &str) -> Result<()> {
    edit_config(db, name, |s| {
        Ok(format!("Added participant {}", s.add_participant().name))
    })?;
    Ok(())
}

pub fn cmd_edit_remove_participant(db: &Database, name: &str, participant: &str) -> Result<()> {
    edit_config(db, name, |s| {
        s.remove_participant(participant)?;
        Ok(format!("Removed participant {}", participant))
    })?;
    Ok(())
}

pub fn cmd_edit_add_person(db: &Database, name: &str) -> Result<()> {
    edit_config(db, name, |s| Ok(format!("Added person {}", s.add_person().name)))?;
    Ok(())
}

pub fn cmd_edit_remove_person(db: &Database, name: &str, person: &str) -> Result<()> {
    edit_config(db, name, |s| {
        s.remove_person(person)?;
        Ok(format!("Removed person {}", person))
    })?;
    Ok(())
}

pub fn cmd_edit_add_category(db: &Database, name: &str) -> Result<()> {
    edit_config(db, name, |s| {
        Ok(format!("Added category {}", s.add_category().name))
    })?;
    Ok(())
}

pub fn cmd_edit_remove_category(db: &Database, name: &str, category: &str) -> Result<()> {
    edit_config(db, name, |s| {
        s.remove_category(category)?;
        Ok(format!("Removed category {}", category))
    })?;
    Ok(())
}

pub fn cmd_edit_add_charge(db: &Database, name: &str, kind: ChargeKind) -> Result<()> {
    edit_config(db, name, |s| {
        let charge = s.add_charge(kind);
        Ok(format!("Added {} charge '{}'", charge.kind, charge.name))
    })?;
    Ok(())
}

/// `position` is 1-based, matching the order charges are listed in
pub fn cmd_edit_remove_charge(db: &Database, name: &str, position: usize) -> Result<()> {
    edit_config(db, name, |s| {
        let Some(index) = position.checked_sub(1) else {
            bail!("Charge positions start at 1");
        };
        let removed = s.remove_charge(index)?;
        Ok(format!("Removed charge '{}'", removed.name))
    })?;
    Ok(())
}
