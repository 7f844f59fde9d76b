//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_defaults` - Shared utility to resolve the defaults file
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;
use hearth_core::{Database, Defaults};

/// Name of the configuration seeded by `init`
pub const DEFAULT_CONFIG_NAME: &str = "default";

/// Open the configuration database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Load defaults from an explicit file, the user override or the built-in copy
pub fn load_defaults(path: Option<&Path>) -> Result<Defaults> {
    match path {
        Some(path) => Defaults::load_from(path)
            .with_context(|| format!("Failed to load defaults from {}", path.display())),
        None => Defaults::load().context("Failed to load defaults"),
    }
}

/// Current calendar year (local time)
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn cmd_init(db_path: &Path, defaults: &Defaults) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    if db.get_config(DEFAULT_CONFIG_NAME)?.is_none() {
        let snapshot = defaults.snapshot(current_year());
        db.save_config(DEFAULT_CONFIG_NAME, &snapshot, Some(0))
            .context("Failed to seed default configuration")?;
        println!(
            "   Seeded '{}' configuration for {} ({} weeks)",
            DEFAULT_CONFIG_NAME,
            snapshot.year,
            snapshot.weeks.len()
        );
    } else {
        println!("   '{}' configuration already present", DEFAULT_CONFIG_NAME);
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Assign weeks: hearth edit --config default assign 1 P1");
    println!("  2. Run the simulation: hearth simulate --config default");
    println!("  3. Start web UI: hearth serve");

    Ok(())
}
