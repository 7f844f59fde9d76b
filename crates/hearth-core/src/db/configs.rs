//! Named configuration operations

use std::collections::BTreeMap;

use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{ConfigEntry, ConfigSummary, Snapshot};

/// Names are stored trimmed; every accessor normalizes the same way
fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidData("Configuration name is required".into()));
    }
    Ok(trimmed)
}

impl Database {
    /// All stored configurations, keyed by name
    pub fn list_configs(&self) -> Result<BTreeMap<String, Snapshot>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name, document FROM configs ORDER BY name")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(name, document)| -> Result<(String, Snapshot)> {
                Ok((name, serde_json::from_str(&document)?))
            })
            .collect()
    }

    /// Name, version and last update of every stored configuration
    pub fn list_config_summaries(&self) -> Result<Vec<ConfigSummary>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT name, version, updated_at FROM configs ORDER BY name")?;

        let summaries = stmt
            .query_map([], |row| {
                let updated_at: String = row.get(2)?;
                Ok(ConfigSummary {
                    name: row.get(0)?,
                    version: row.get(1)?,
                    updated_at: parse_datetime(&updated_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    /// Get a stored configuration with its metadata
    pub fn get_config_entry(&self, name: &str) -> Result<Option<ConfigEntry>> {
        let name = validate_name(name)?;
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT name, document, version, created_at, updated_at FROM configs WHERE name = ?",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((name, document, version, created_at, updated_at)) => Ok(Some(ConfigEntry {
                name,
                snapshot: serde_json::from_str(&document)?,
                version,
                created_at: parse_datetime(&created_at),
                updated_at: parse_datetime(&updated_at),
            })),
            None => Ok(None),
        }
    }

    /// Get a stored snapshot by name
    pub fn get_config(&self, name: &str) -> Result<Option<Snapshot>> {
        Ok(self.get_config_entry(name)?.map(|entry| entry.snapshot))
    }

    /// Store a snapshot under `name`, returning the new version
    ///
    /// With `expected_version`, the save only succeeds if the stored version
    /// matches (0 meaning "does not exist yet"); otherwise it fails with
    /// [`Error::Conflict`].
    pub fn save_config(
        &self,
        name: &str,
        snapshot: &Snapshot,
        expected_version: Option<i64>,
    ) -> Result<i64> {
        let name = validate_name(name)?;
        let document = serde_json::to_string(snapshot)?;

        // Take the write lock before reading the version so the check and
        // the write cannot interleave with another saver
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: i64 = tx
            .query_row(
                "SELECT version FROM configs WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0);

        if let Some(expected) = expected_version {
            if expected != current {
                return Err(Error::Conflict {
                    name: name.to_string(),
                    expected,
                    actual: current,
                });
            }
        }

        let version = current + 1;
        if current == 0 {
            tx.execute(
                "INSERT INTO configs (name, document, version) VALUES (?, ?, ?)",
                params![name, document, version],
            )?;
        } else {
            tx.execute(
                "UPDATE configs SET document = ?, version = ?, updated_at = datetime('now') WHERE name = ?",
                params![document, version, name],
            )?;
        }
        tx.commit()?;

        info!("Saved configuration '{}' (version {})", name, version);
        Ok(version)
    }

    /// Delete a configuration; returns whether it existed
    pub fn delete_config(&self, name: &str) -> Result<bool> {
        let name = validate_name(name)?;
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM configs WHERE name = ?", params![name])?;
        if deleted > 0 {
            info!("Deleted configuration '{}'", name);
        }
        Ok(deleted > 0)
    }
}
