//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `configs` - Stored configuration commands (list, show, new, save, delete, export)
//! - `core` - Init command and shared utilities (open_db, load_defaults)
//! - `edit` - Configuration edits (weeks, participants, people, categories)
//! - `serve` - Web server command
//! - `simulate` - Simulation report and calendar commands

pub mod configs;
pub mod core;
pub mod edit;
pub mod serve;
pub mod simulate;

// Re-export command functions for main.rs
pub use configs::*;
pub use core::*;
pub use edit::*;
pub use serve::*;
pub use simulate::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
