//! Fixed-size thread pool fed by a bounded job queue.

use log::{error, info};
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubmitError {
    Full,
    Closed,
}

pub(crate) struct WorkerPool {
    sender: Option<SyncSender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `worker_threads` workers sharing a queue of `queue_capacity` jobs.
    pub(crate) fn new(worker_threads: usize, queue_capacity: usize) -> io::Result<Self> {
        let (sender, receiver) = mpsc::sync_channel::<Job>(queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(worker_threads);
        for index in 0..worker_threads {
            let receiver = Arc::clone(&receiver);
            let worker = thread::Builder::new()
                .name(format!("contacts-worker-{index}"))
                .spawn(move || worker_loop(index, &receiver))?;
            workers.push(worker);
        }

        info!(
            "event=pool_start module=coordinator status=ok workers={} queue_capacity={}",
            worker_threads, queue_capacity
        );

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    pub(crate) fn submit(&self, job: Job) -> Result<(), SubmitError> {
        let Some(sender) = self.sender.as_ref() else {
            return Err(SubmitError::Closed);
        };
        sender.try_send(job).map_err(|err| match err {
            TrySendError::Full(_) => SubmitError::Full,
            TrySendError::Disconnected(_) => SubmitError::Closed,
        })
    }

    /// Stops accepting jobs, lets queued jobs finish, then joins every worker.
    pub(crate) fn shutdown(&mut self) {
        if self.sender.take().is_none() {
            return;
        }

        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("event=pool_shutdown module=coordinator status=error error_code=worker_panicked");
            }
        }
        info!("event=pool_shutdown module=coordinator status=ok");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(index: usize, receiver: &Mutex<Receiver<Job>>) {
    loop {
        let next = match receiver.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => break,
        };

        let Ok(job) = next else {
            break;
        };

        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!(
                "event=job_panicked module=coordinator status=error worker={}",
                index
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SubmitError, WorkerPool};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn shutdown_drains_queued_jobs() {
        let mut pool = WorkerPool::new(2, 16).unwrap();
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let done = Arc::clone(&done);
            pool.submit(Box::new(move || {
                done.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }

        pool.shutdown();
        assert_eq!(done.load(Ordering::SeqCst), 10);
        assert_eq!(
            pool.submit(Box::new(|| {})).unwrap_err(),
            SubmitError::Closed
        );
    }

    #[test]
    fn full_queue_is_rejected_without_blocking() {
        let pool = WorkerPool::new(1, 1).unwrap();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel::<()>();

        pool.submit(Box::new(move || {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        }))
        .unwrap();
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        pool.submit(Box::new(|| {})).unwrap();
        assert_eq!(pool.submit(Box::new(|| {})).unwrap_err(), SubmitError::Full);

        release_tx.send(()).unwrap();
    }

    #[test]
    fn panicking_job_does_not_kill_worker() {
        let pool = WorkerPool::new(1, 4).unwrap();
        pool.submit(Box::new(|| panic!("boom"))).unwrap();

        let (tx, rx) = mpsc::channel();
        pool.submit(Box::new(move || tx.send(42).unwrap())).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    }
}
