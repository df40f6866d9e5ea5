//! Board schema versioning on top of `PRAGMA user_version`.

use super::schema;
use rusqlite::{Connection, ffi, types::Type};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "players",
    sql: schema::PLAYERS_V1_SQL,
}];

/// Highest schema version this build can write.
pub const LATEST_SCHEMA_VERSION: u32 = 1;

/// Schema version stamped in the database file, `0` for a fresh file.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read or is negative.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let raw: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(err)))
}

/// Bring the board schema up to [`LATEST_SCHEMA_VERSION`].
///
/// Pending steps run in one transaction, so a failure leaves the file at its
/// previous version. A file stamped by a newer build is refused rather than
/// written with an older layout.
///
/// # Errors
///
/// Returns an error if the file is newer than this build or a step fails.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<u32> {
    let found = schema_version(conn)?;
    if found > LATEST_SCHEMA_VERSION {
        return Err(rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_MISMATCH),
            Some(format!(
                "board schema v{found} is newer than supported v{LATEST_SCHEMA_VERSION}"
            )),
        ));
    }

    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > found).collect();
    let Some(last) = pending.last() else {
        return Ok(found);
    };

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tracing::debug!(version = step.version, name = step.name, "board schema step");
    }
    tx.pragma_update(None, "user_version", i64::from(last.version))?;
    tx.commit()?;
    Ok(last.version)
}
