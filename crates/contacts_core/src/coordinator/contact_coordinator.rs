//! Contact coordinator: repository calls on a bounded worker pool.
//!
//! # Responsibility
//! - Offload every repository operation to a worker thread.
//! - Deliver each outcome through a `Ticket` or a success/failure callback.
//! - Tag searches with sequence numbers so callers can ignore stale results.
//!
//! # Invariants
//! - Blank search queries are never scheduled.
//! - Overlapping searches are neither coalesced nor cancelled; every accepted
//!   search produces exactly one outcome.
//! - Only an accepted search becomes the latest; a rejected one leaves the
//!   previous latest in place.

use super::ticket::Ticket;
use super::worker_pool::{SubmitError, WorkerPool};
use crate::config::CoreConfig;
use crate::model::contact::{Contact, ContactDraft, ContactId};
use crate::repo::contact_repo::{ContactListRepository, RepoError, RepoResult};
use crate::store::contact_store::ContactStore;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex, PoisonError};

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

/// Failure to schedule a job or to obtain its result.
#[derive(Debug)]
pub enum CoordinatorError {
    /// Search text was empty or whitespace only.
    BlankQuery,
    /// The job queue is full; nothing was scheduled.
    Busy,
    /// The coordinator has been shut down.
    ShutDown,
    /// Worker count or queue capacity was zero.
    InvalidPoolSize,
    /// A worker thread could not be started.
    Spawn(std::io::Error),
    /// The job ended without producing a result (it panicked).
    Disconnected,
    /// The repository call itself failed.
    Repo(RepoError),
}

impl Display for CoordinatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankQuery => write!(f, "search text cannot be blank"),
            Self::Busy => write!(f, "too many contact operations in flight"),
            Self::ShutDown => write!(f, "contact coordinator has been shut down"),
            Self::InvalidPoolSize => {
                write!(f, "worker threads and queue capacity must be at least 1")
            }
            Self::Spawn(err) => write!(f, "failed to start worker thread: {err}"),
            Self::Disconnected => write!(f, "contact operation ended without a result"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CoordinatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SubmitError> for CoordinatorError {
    fn from(value: SubmitError) -> Self {
        match value {
            SubmitError::Full => Self::Busy,
            SubmitError::Closed => Self::ShutDown,
        }
    }
}

impl From<RepoError> for CoordinatorError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Runs contact repository operations on background workers.
pub struct ContactCoordinator<S>
where
    S: ContactStore + Send + Sync + 'static,
{
    repo: Arc<ContactListRepository<S>>,
    pool: WorkerPool,
    next_sequence: AtomicU64,
    latest_search: Mutex<u64>,
}

impl<S> ContactCoordinator<S>
where
    S: ContactStore + Send + Sync + 'static,
{
    /// Starts `worker_threads` workers behind a queue of `queue_capacity` jobs.
    pub fn new(
        repo: ContactListRepository<S>,
        worker_threads: usize,
        queue_capacity: usize,
    ) -> CoordinatorResult<Self> {
        if worker_threads == 0 || queue_capacity == 0 {
            return Err(CoordinatorError::InvalidPoolSize);
        }

        let pool = WorkerPool::new(worker_threads, queue_capacity)
            .map_err(CoordinatorError::Spawn)?;
        Ok(Self {
            repo: Arc::new(repo),
            pool,
            next_sequence: AtomicU64::new(0),
            latest_search: Mutex::new(0),
        })
    }

    /// Starts a coordinator sized by `config`.
    pub fn from_config(
        repo: ContactListRepository<S>,
        config: &CoreConfig,
    ) -> CoordinatorResult<Self> {
        Self::new(repo, config.worker_threads, config.queue_capacity)
    }

    pub fn repository(&self) -> &ContactListRepository<S> {
        &self.repo
    }

    /// Schedules a name search.
    ///
    /// # Errors
    /// - `BlankQuery` when `query` is empty or whitespace only.
    /// - `Busy` / `ShutDown` when the job could not be queued.
    pub fn search(&self, query: &str) -> CoordinatorResult<Ticket<Vec<Contact>>> {
        if query.trim().is_empty() {
            return Err(CoordinatorError::BlankQuery);
        }

        let query = query.to_string();
        self.schedule_search(|sequence| {
            self.dispatch_as(sequence, "contact_search", move |repo| repo.search(&query))
        })
    }

    /// Schedules a name search whose outcome is handed to a callback.
    ///
    /// Callbacks run on the worker thread; callers marshal the outcome to
    /// their own thread. Returns the search sequence number.
    pub fn search_with<F, E>(
        &self,
        query: &str,
        on_success: F,
        on_failure: E,
    ) -> CoordinatorResult<u64>
    where
        F: FnOnce(Vec<Contact>) + Send + 'static,
        E: FnOnce(RepoError) + Send + 'static,
    {
        if query.trim().is_empty() {
            return Err(CoordinatorError::BlankQuery);
        }

        let query = query.to_string();
        let repo = Arc::clone(&self.repo);
        self.schedule_search(|sequence| {
            self.submit("contact_search", sequence, move || {
                repo.search_with(&query, on_success, on_failure);
            })?;
            Ok(sequence)
        })
    }

    /// Returns whether `sequence` belongs to the most recently scheduled search.
    pub fn is_latest_search(&self, sequence: u64) -> bool {
        *self.lock_latest_search() == sequence
    }

    pub fn add(&self, draft: ContactDraft) -> CoordinatorResult<Ticket<Contact>> {
        self.dispatch("contact_add", move |repo| repo.add(&draft))
    }

    pub fn list(&self) -> CoordinatorResult<Ticket<Vec<Contact>>> {
        self.dispatch("contact_list", |repo| repo.list())
    }

    pub fn get(&self, id: ContactId) -> CoordinatorResult<Ticket<Option<Contact>>> {
        self.dispatch("contact_get", move |repo| repo.get(id))
    }

    pub fn update(
        &self,
        id: ContactId,
        draft: ContactDraft,
    ) -> CoordinatorResult<Ticket<usize>> {
        self.dispatch("contact_update", move |repo| repo.update(id, &draft))
    }

    pub fn delete(&self, id: ContactId) -> CoordinatorResult<Ticket<usize>> {
        self.dispatch("contact_delete", move |repo| repo.delete(id))
    }

    /// Stops accepting work and waits for queued jobs to finish.
    pub fn shutdown(mut self) {
        self.pool.shutdown();
    }

    fn dispatch<T, F>(&self, event: &'static str, op: F) -> CoordinatorResult<Ticket<T>>
    where
        T: Send + 'static,
        F: FnOnce(&ContactListRepository<S>) -> RepoResult<T> + Send + 'static,
    {
        let sequence = self.reserve_sequence();
        self.dispatch_as(sequence, event, op)
    }

    fn dispatch_as<T, F>(
        &self,
        sequence: u64,
        event: &'static str,
        op: F,
    ) -> CoordinatorResult<Ticket<T>>
    where
        T: Send + 'static,
        F: FnOnce(&ContactListRepository<S>) -> RepoResult<T> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let repo = Arc::clone(&self.repo);
        self.submit(event, sequence, move || {
            // The ticket may already be dropped; the result is then discarded.
            let _ = sender.send(op(&repo));
        })?;
        Ok(Ticket::new(sequence, receiver))
    }

    fn submit(
        &self,
        event: &'static str,
        sequence: u64,
        job: impl FnOnce() + Send + 'static,
    ) -> CoordinatorResult<()> {
        match self.pool.submit(Box::new(job)) {
            Ok(()) => {
                debug!(
                    "event={} module=coordinator status=queued seq={}",
                    event, sequence
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event={} module=coordinator status=rejected seq={} reason={:?}",
                    event, sequence, err
                );
                Err(err.into())
            }
        }
    }

    /// Reserves a sequence and submits under the latest-search lock, recording
    /// the sequence as latest only once `submit` succeeds.
    fn schedule_search<T>(
        &self,
        submit: impl FnOnce(u64) -> CoordinatorResult<T>,
    ) -> CoordinatorResult<T> {
        let mut latest = self.lock_latest_search();
        let sequence = self.reserve_sequence();
        let scheduled = submit(sequence)?;
        *latest = sequence;
        Ok(scheduled)
    }

    fn lock_latest_search(&self) -> std::sync::MutexGuard<'_, u64> {
        self.latest_search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn reserve_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}
