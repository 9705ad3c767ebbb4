//! Shared, closable handle to the contacts database.
//!
//! # Invariants
//! - At most one statement runs on the connection at a time.
//! - After `close`, every `with_conn` call fails with `DbError::Unavailable`.
//! - A panic inside `with_conn` does not disable the handle; the next caller
//!   recovers the lock and logs `event=db_lock_poisoned`.

use super::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable owner of the single connection used by every store operation.
///
/// Constructed once at process start and handed to each component that needs
/// it. Clones share the same underlying connection.
#[derive(Clone)]
pub struct DbHandle {
    inner: Arc<Mutex<Option<Connection>>>,
}

impl DbHandle {
    pub fn new(conn: Connection) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(conn))),
        }
    }

    /// Runs `f` with exclusive access to the open connection.
    ///
    /// # Errors
    /// - `DbError::Unavailable` when the handle was closed.
    /// - Whatever `f` returns.
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let guard = self.lock();
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(DbError::Unavailable.into()),
        }
    }

    /// Returns whether the connection is still open.
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Closes the shared connection for every clone of this handle.
    ///
    /// Closing an already closed handle is a no-op.
    pub fn close(&self) -> DbResult<()> {
        let taken = {
            let mut guard = self.lock();
            guard.take()
        };

        let Some(conn) = taken else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((_, err)) => {
                warn!("event=db_close module=db status=error error={}", err);
                Err(err.into())
            }
        }
    }
}

impl DbHandle {
    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("event=db_lock_poisoned module=db status=recovered");
            self.inner.clear_poison();
            poisoned.into_inner()
        })
    }
}

impl std::fmt::Debug for DbHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbHandle")
            .field("open", &self.is_open())
            .finish()
    }
}
