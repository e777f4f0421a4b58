//! Ordered schema steps for the YaNote database.
//!
//! Each step is one SQL file. After a step runs inside the upgrade
//! transaction, `PRAGMA user_version` is set to its number, so a partially
//! applied upgrade never becomes visible.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// One schema step; `version` is what `user_version` reads once it ran.
#[derive(Debug, Clone, Copy)]
struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "users_notes",
        sql: include_str!("0001_users_notes.sql"),
    },
    Step {
        version: 2,
        name: "sessions",
        sql: include_str!("0002_sessions.sql"),
    },
];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the schema up to `latest_version()`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   build.
/// - `DbError::Sqlite` when a step fails; nothing is committed then.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let pending = pending_steps(from)?;
    let Some(last) = pending.last() else {
        return Ok(());
    };
    let to = last.version;

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={from} to={to}");
    Ok(())
}

fn pending_steps(from: u32) -> DbResult<Vec<&'static Step>> {
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }
    Ok(STEPS.iter().filter(|step| step.version > from).collect())
}
