//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hearth_core::ChargeKind;

/// Hearth - Share the cost of a jointly-owned property
#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Shared-property cost simulator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "hearth.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults file (falls back to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub defaults: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed the default configuration
    Init,

    /// Run the allocation engine and print the report
    Simulate {
        /// Snapshot document to simulate
        #[arg(short, long, conflicts_with = "config")]
        file: Option<PathBuf>,

        /// Stored configuration to simulate
        #[arg(short, long)]
        config: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the ISO weeks of a year
    Calendar {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Manage stored configurations (list, show, new, save, delete, export)
    Configs {
        #[command(subcommand)]
        action: Option<ConfigsAction>,
    },

    /// Edit a stored configuration
    Edit {
        /// Configuration name
        #[arg(short, long)]
        config: String,

        #[command(subcommand)]
        action: EditAction,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory of static files to serve (e.g. the browser UI)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigsAction {
    /// List stored configurations
    List,

    /// Show a configuration as JSON
    Show {
        /// Configuration name
        name: String,
    },

    /// Create a configuration from the defaults
    New {
        /// Configuration name
        name: String,
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Import a snapshot document and store it
    Save {
        /// Configuration name
        name: String,
        /// Snapshot document (JSON)
        #[arg(short, long)]
        file: PathBuf,
        /// Only save if the stored version matches (0 = must not exist)
        #[arg(long)]
        expected_version: Option<i64>,
    },

    /// Delete a configuration
    Delete {
        /// Configuration name
        name: String,
    },

    /// Export a configuration to a JSON file
    Export {
        /// Configuration name
        name: String,
        /// Output file (defaults to hearth-simulation-YYYY-MM-DD.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum EditAction {
    /// Switch to another year (weeks carry over by position)
    Year {
        year: i32,
    },

    /// Assign a week to a person (omit the name to free the week)
    Assign {
        /// Week number (1-53)
        week: u32,
        /// Person name
        who: Option<String>,
    },

    /// Set a week's weight in percent (0-1000)
    Weight {
        /// Week number (1-53)
        week: u32,
        weight: f64,
    },

    /// Set a week's revised price (omit the price to clear it)
    Revise {
        /// Week number (1-53)
        week: u32,
        price: Option<f64>,
    },

    /// Add a participant with 0% ownership
    AddParticipant,

    /// Remove a participant, their person entry and their weeks
    RemoveParticipant {
        name: String,
    },

    /// Add a person in the first category
    AddPerson,

    /// Remove a person and free their weeks
    RemovePerson {
        name: String,
    },

    /// Add a neutral category
    AddCategory,

    /// Remove a category (its people move to the first remaining one)
    RemoveCategory {
        name: String,
    },

    /// Add a zero-cost charge (recurring or amortized)
    AddCharge {
        #[arg(short, long, default_value = "recurring")]
        kind: ChargeKind,
    },

    /// Remove a charge by its position in the list (1-based)
    RemoveCharge {
        position: usize,
    },
}
