//! Contacts store layout versions.
//!
//! Each step is a SQL script applied once, in order, inside one transaction
//! with the version bump. The store's `PRAGMA user_version` records the last
//! applied step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, script)` pairs, strictly increasing by version.
const LAYOUT_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_contacts.sql"))];

/// Returns the newest layout version this build can create and read.
pub fn latest_version() -> u32 {
    LAYOUT_STEPS.last().map_or(0, |&(version, _)| version)
}

/// Returns the layout version recorded in the store.
pub fn store_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the store up to `latest_version()`.
///
/// # Errors
/// - `DbError::StoreTooNew` when the store records a newer layout.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = store_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::StoreTooNew { found, supported });
    }

    let pending = LAYOUT_STEPS
        .iter()
        .filter(|&&(version, _)| version > found)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &&(version, script) in &pending {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={supported} steps={}",
        pending.len()
    );
    Ok(())
}
