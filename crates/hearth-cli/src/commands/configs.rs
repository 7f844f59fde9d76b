//! Stored configuration commands (list, show, new, save, delete, export)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use hearth_core::{
    coerce::clamp_year,
    snapshot::{export_document, export_file_name, import_document},
    Database, Defaults,
};

use super::current_year;

pub fn cmd_configs_list(db: &Database) -> Result<()> {
    let summaries = db.list_config_summaries()?;

    if summaries.is_empty() {
        println!("No configurations stored. Create one with 'hearth configs new NAME'.");
        return Ok(());
    }

    println!("📁 Configurations");
    println!("   ─────────────────────────────────────────────");
    println!("   {:<24} {:>8}  {}", "Name", "Version", "Updated");
    for summary in &summaries {
        println!(
            "   {:<24} {:>8}  {}",
            summary.name,
            summary.version,
            summary.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub fn cmd_configs_show(db: &Database, name: &str) -> Result<()> {
    let Some(snapshot) = db.get_config(name)? else {
        bail!("Configuration '{}' not found", name);
    };
    println!("{}", export_document(&snapshot)?);
    Ok(())
}

pub fn cmd_configs_new(
    db: &Database,
    defaults: &Defaults,
    name: &str,
    year: Option<i32>,
) -> Result<()> {
    let snapshot = defaults.snapshot(clamp_year(year.unwrap_or_else(current_year)));
    let version = db
        .save_config(name, &snapshot, Some(0))
        .with_context(|| format!("Failed to create configuration '{}'", name))?;

    println!(
        "✅ Created '{}' for {} (version {})",
        name.trim(),
        snapshot.year,
        version
    );
    Ok(())
}

pub fn cmd_configs_save(
    db: &Database,
    defaults: &Defaults,
    name: &str,
    file: &Path,
    expected_version: Option<i64>,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let snapshot = import_document(&text, defaults, current_year())
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let version = db.save_config(name, &snapshot, expected_version)?;
    println!("✅ Saved '{}' (version {})", name.trim(), version);
    Ok(())
}

pub fn cmd_configs_delete(db: &Database, name: &str) -> Result<()> {
    if db.delete_config(name)? {
        println!("🗑️  Deleted '{}'", name);
    } else {
        println!("Configuration '{}' does not exist", name);
    }
    Ok(())
}

/// Export a configuration, returning the path written
pub fn cmd_configs_export(db: &Database, name: &str, output: Option<&Path>) -> Result<PathBuf> {
    let Some(snapshot) = db.get_config(name)? else {
        bail!("Configuration '{}' not found", name);
    };

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(export_file_name(chrono::Local::now().date_naive())));
    std::fs::write(&path, export_document(&snapshot)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("📤 Exported '{}' to {}", name, path.display());
    Ok(path)
}
