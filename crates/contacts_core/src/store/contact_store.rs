//! Contact store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/fetch/find/search/update/delete over `contacts`.
//! - Report affected-row counts exactly as SQLite does.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT` and are never reused.
//! - Listing and search return rows in `_id` order.
//! - Search is a literal "contains" match on `name`; `%`, `_` and `\` in
//!   the input carry no wildcard meaning.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::schema::{REQUIRED_COLUMNS, TABLE_NAME};
use crate::db::{DbError, DbHandle};
use crate::model::contact::{Contact, ContactId};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const CONTACT_SELECT_SQL: &str = "SELECT _id, name, phone FROM contacts";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for contact persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl StoreError {
    /// Returns whether the failure means the database could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Db(DbError::Unavailable))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store interface over persisted contacts.
pub trait ContactStore {
    /// Inserts a new row and returns the store-assigned id.
    fn insert(&self, name: &str, phone: &str) -> StoreResult<ContactId>;
    /// Returns every row in insertion order.
    fn fetch_all(&self) -> StoreResult<Vec<Contact>>;
    fn find_by_id(&self, id: ContactId) -> StoreResult<Option<Contact>>;
    /// Returns rows whose name contains `substring`; empty input matches all.
    fn search(&self, substring: &str) -> StoreResult<Vec<Contact>>;
    /// Replaces name and phone of the row with `contact.id`; returns rows affected.
    fn update(&self, contact: &Contact) -> StoreResult<usize>;
    /// Removes the row with `id`; returns rows affected.
    fn delete_by_id(&self, id: ContactId) -> StoreResult<usize>;
    fn count(&self) -> StoreResult<usize>;
}

/// SQLite-backed contact store sharing one [`DbHandle`].
#[derive(Debug, Clone)]
pub struct SqliteContactStore {
    db: DbHandle,
}

impl SqliteContactStore {
    /// Wraps `db` after checking that its schema is usable.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on a foreign layout.
    pub fn try_new(db: DbHandle) -> StoreResult<Self> {
        db.with_conn(verify_schema)?;
        Ok(Self { db })
    }

    pub fn handle(&self) -> &DbHandle {
        &self.db
    }

    fn run<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let result = self.db.with_conn(op);
        match &result {
            Ok(_) => debug!(
                "event={} module=store status=ok duration_ms={}",
                event,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event={} module=store status=error duration_ms={} error={}",
                event,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl ContactStore for SqliteContactStore {
    fn insert(&self, name: &str, phone: &str) -> StoreResult<ContactId> {
        self.run("contact_insert", |conn| {
            conn.execute(
                "INSERT INTO contacts (name, phone) VALUES (?1, ?2);",
                params![name, phone],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn fetch_all(&self) -> StoreResult<Vec<Contact>> {
        self.run("contact_fetch_all", |conn| {
            let mut stmt = conn.prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY _id ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut contacts = Vec::new();
            while let Some(row) = rows.next()? {
                contacts.push(parse_contact_row(row)?);
            }
            Ok(contacts)
        })
    }

    fn find_by_id(&self, id: ContactId) -> StoreResult<Option<Contact>> {
        self.run("contact_find", |conn| {
            let mut stmt = conn.prepare(&format!("{CONTACT_SELECT_SQL} WHERE _id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(parse_contact_row(row)?));
            }
            Ok(None)
        })
    }

    fn search(&self, substring: &str) -> StoreResult<Vec<Contact>> {
        let pattern = contains_pattern(substring);
        self.run("contact_search", |conn| {
            let mut stmt = conn.prepare(&format!(
                "{CONTACT_SELECT_SQL} WHERE name LIKE ?1 ESCAPE '\\' ORDER BY _id ASC;"
            ))?;
            let mut rows = stmt.query([pattern.as_str()])?;
            let mut contacts = Vec::new();
            while let Some(row) = rows.next()? {
                contacts.push(parse_contact_row(row)?);
            }
            Ok(contacts)
        })
    }

    fn update(&self, contact: &Contact) -> StoreResult<usize> {
        self.run("contact_update", |conn| {
            let changed = conn.execute(
                "UPDATE contacts SET name = ?1, phone = ?2 WHERE _id = ?3;",
                params![contact.name.as_str(), contact.phone.as_str(), contact.id],
            )?;
            Ok(changed)
        })
    }

    fn delete_by_id(&self, id: ContactId) -> StoreResult<usize> {
        self.run("contact_delete", |conn| {
            let changed = conn.execute("DELETE FROM contacts WHERE _id = ?1;", [id])?;
            Ok(changed)
        })
    }

    fn count(&self) -> StoreResult<usize> {
        self.run("contact_count", |conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
            usize::try_from(count)
                .map_err(|_| StoreError::InvalidData(format!("negative row count `{count}`")))
        })
    }
}

fn verify_schema(conn: &Connection) -> StoreResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([TABLE_NAME], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(StoreError::MissingRequiredTable(TABLE_NAME));
    }

    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|existing| existing == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: TABLE_NAME,
                column,
            });
        }
    }

    Ok(())
}

fn parse_contact_row(row: &Row<'_>) -> StoreResult<Contact> {
    let id: ContactId = row.get("_id")?;
    let name: Option<String> = row.get("name")?;
    let phone: Option<String> = row.get("phone")?;

    match (name, phone) {
        (Some(name), Some(phone)) => Ok(Contact { id, name, phone }),
        _ => Err(StoreError::InvalidData(format!(
            "null name or phone in contacts row {id}"
        ))),
    }
}

/// Builds a `LIKE` pattern matching any name that contains `substring` literally.
fn contains_pattern(substring: &str) -> String {
    let mut pattern = String::with_capacity(substring.len() + 2);
    pattern.push('%');
    for ch in substring.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
