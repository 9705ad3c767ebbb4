//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//! - Provide the legacy drop-and-recreate upgrade as an opt-in policy.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - `DropAndRecreate` discards every stored contact on a version mismatch.

use crate::db::schema::DROP_CONTACTS_SQL;
use crate::db::{DbError, DbResult};
use log::warn;
use rusqlite::Connection;
use serde::Deserialize;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// How a database written by a different schema version is brought up to date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePolicy {
    /// Apply every pending migration in order; refuse databases from newer builds.
    #[default]
    Migrate,
    /// Drop the contacts table and recreate it whenever the stored version
    /// differs from the latest one, in either direction. Existing rows are lost.
    DropAndRecreate,
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the schema on `conn` to [`latest_version`] according to `policy`.
pub fn apply_migrations(conn: &mut Connection, policy: UpgradePolicy) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version == latest {
        return Ok(());
    }

    match policy {
        UpgradePolicy::Migrate => migrate_forward(conn, current_version, latest),
        UpgradePolicy::DropAndRecreate if current_version == 0 => {
            migrate_forward(conn, current_version, latest)
        }
        UpgradePolicy::DropAndRecreate => drop_and_recreate(conn, current_version, latest),
    }
}

fn migrate_forward(conn: &mut Connection, current_version: u32, latest: u32) -> DbResult<()> {
    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn drop_and_recreate(conn: &mut Connection, current_version: u32, latest: u32) -> DbResult<()> {
    warn!(
        "event=schema_reset module=db status=start from_version={} to_version={} data_loss=true",
        current_version, latest
    );

    let tx = conn.transaction()?;
    tx.execute_batch(DROP_CONTACTS_SQL)?;
    for migration in MIGRATIONS {
        tx.execute_batch(migration.sql)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {latest};"))?;
    tx.commit()?;

    Ok(())
}

/// Reads the schema version stored in the database header.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, MIGRATIONS};

    #[test]
    fn migration_versions_are_strictly_increasing() {
        let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.version).collect();
        assert!(versions.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(latest_version(), *versions.last().unwrap());
    }

    #[test]
    fn latest_version_matches_schema_constant() {
        assert_eq!(latest_version(), crate::db::schema::DATABASE_VERSION);
    }
}
