//! Error types for Hearth
//!
//! The allocation engine itself never fails: malformed numbers degrade to
//! "unset" or zero. Errors only come from the I/O layers around it
//! (snapshot import, defaults file, configuration store).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Version conflict on '{name}': expected {expected}, found {actual}")]
    Conflict {
        name: String,
        expected: i64,
        actual: i64,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
