//! Ordered schema steps for the slot database.
//!
//! # Invariants
//! - Step versions strictly increase.
//! - All pending steps commit together, then `user_version` names the last one.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// (version, SQL) pairs applied in order.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_slots.sql"))];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file is newer than this build.
/// - [`DbError::Sqlite`] when a step fails; no step of the batch is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }

    let mut pending = SCHEMA_STEPS
        .iter()
        .filter(|(version, _)| *version > stored)
        .peekable();
    if pending.peek().is_none() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;
    Ok(())
}
