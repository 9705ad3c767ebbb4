//! Contact list core: SQLite record store, repository and background coordinator.
//! This crate is the single source of truth for contact persistence rules.

pub mod config;
pub mod coordinator;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use config::CoreConfig;
pub use coordinator::{ContactCoordinator, CoordinatorError, CoordinatorResult, Ticket};
pub use db::{open_db, open_db_in_memory, DbError, DbHandle, DbResult, UpgradePolicy};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::contact::{Contact, ContactDraft, ContactId, ContactValidationError};
pub use repo::contact_repo::{ContactListRepository, RepoError, RepoResult, INSERT_FAILED_ID};
pub use store::contact_store::{ContactStore, SqliteContactStore, StoreError, StoreResult};

/// Repository type used by applications backed by the bundled SQLite store.
pub type SqliteContactRepository = ContactListRepository<SqliteContactStore>;

/// Opens the configured database and wires store, repository and coordinator.
///
/// The returned handle is the one shared connection; closing it makes every
/// later operation fail with `Unavailable`.
pub fn open_coordinator(
    config: &CoreConfig,
) -> Result<(DbHandle, ContactCoordinator<SqliteContactStore>), String> {
    config.validate()?;
    let conn = open_db(&config.db_path, config.upgrade_policy).map_err(|err| err.to_string())?;
    let handle = DbHandle::new(conn);
    let store = SqliteContactStore::try_new(handle.clone()).map_err(|err| err.to_string())?;
    let coordinator = ContactCoordinator::from_config(ContactListRepository::new(store), config)
        .map_err(|err| err.to_string())?;
    Ok((handle, coordinator))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
