//! Hearth Core Library
//!
//! Shared functionality for the Hearth shared-property cost simulator:
//! - Allocation engine (annual cost, ISO week calendar, weekly pricing, settlement)
//! - Snapshot documents with lenient import, export and edits
//! - Defaults file with an embedded fallback
//! - SQLite store for named configurations

pub mod annual;
pub mod calendar;
pub mod coerce;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod pricing;
pub mod settlement;
pub mod snapshot;

pub use annual::{compute_annual, AnnualCost};
pub use calendar::{build_weeks_for_year, iso_week1_monday, iso_weeks_count};
pub use config::Defaults;
pub use db::Database;
pub use engine::{simulate, Simulation};
pub use error::{Error, Result};
pub use models::{
    Category, Charge, ChargeKind, ConfigEntry, ConfigSummary, Participant, Person, Snapshot, Week,
};
pub use pricing::{compute_weeks_pricing, FactorSource, WeekPrice, WeeksPricing};
pub use settlement::{compute_participant_settlement, ParticipantSettlement, SettlementSummary};
