//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use hearth_core::Defaults;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    defaults: Defaults,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Hearth web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Extra CORS origins (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("HEARTH_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} (HEARTH_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let config = hearth_server::ServerConfig {
        allowed_origins,
        ..Default::default()
    };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("Static directory path must be valid UTF-8"))
        .transpose()?;
    hearth_server::serve_with_config(db, defaults, host, port, static_dir_str, config).await?;

    Ok(())
}
