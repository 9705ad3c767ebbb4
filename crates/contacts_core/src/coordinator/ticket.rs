//! Result handle for one background job.

use super::contact_coordinator::{CoordinatorError, CoordinatorResult};
use crate::repo::contact_repo::RepoResult;
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// Pending result of a job submitted to [`super::ContactCoordinator`].
///
/// The result can be taken once. Dropping the ticket does not cancel the job;
/// its result is simply discarded.
#[derive(Debug)]
pub struct Ticket<T> {
    sequence: u64,
    receiver: Receiver<RepoResult<T>>,
}

impl<T> Ticket<T> {
    pub(crate) fn new(sequence: u64, receiver: Receiver<RepoResult<T>>) -> Self {
        Self { sequence, receiver }
    }

    /// Submission order of this job; strictly increasing per coordinator.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Blocks until the job finishes.
    pub fn wait(self) -> CoordinatorResult<T> {
        match self.receiver.recv() {
            Ok(result) => result.map_err(CoordinatorError::Repo),
            Err(_) => Err(CoordinatorError::Disconnected),
        }
    }

    /// Blocks for at most `timeout`; `None` means the job is still running.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<CoordinatorResult<T>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result.map_err(CoordinatorError::Repo)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(CoordinatorError::Disconnected)),
        }
    }

    /// Polls without blocking; `None` means the job is still running.
    pub fn try_take(&self) -> Option<CoordinatorResult<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result.map_err(CoordinatorError::Repo)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CoordinatorError::Disconnected)),
        }
    }
}
