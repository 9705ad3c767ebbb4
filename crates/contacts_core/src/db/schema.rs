//! Names of the contacts table and its columns.
//!
//! These names are the persisted contract: the table layout must stay
//! readable by any earlier build that shares the same database file.

/// File name used when no explicit database path is configured.
pub const DATABASE_NAME: &str = "Contact.db";

/// Schema version this build writes. Mirrors the latest migration.
pub const DATABASE_VERSION: u32 = 1;

pub const TABLE_NAME: &str = "contacts";
pub const COLUMN_ID: &str = "_id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_PHONE: &str = "phone";

/// Columns every usable `contacts` table must expose.
pub const REQUIRED_COLUMNS: &[&str] = &[COLUMN_ID, COLUMN_NAME, COLUMN_PHONE];

/// Statement used by the drop-and-recreate upgrade path.
pub const DROP_CONTACTS_SQL: &str = "DROP TABLE IF EXISTS contacts;";
