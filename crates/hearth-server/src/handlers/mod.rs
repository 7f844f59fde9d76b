//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod configs;
pub mod simulation;

// Re-export all handlers for use in router
pub use configs::*;
pub use simulation::*;
