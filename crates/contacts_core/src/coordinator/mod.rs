//! Background execution of repository calls.
//!
//! # Responsibility
//! - Keep blocking store work off the interaction thread.
//! - Bound resource usage with a fixed worker pool and a bounded queue.
//! - Hand results back as `Ticket`s (or callbacks) the caller drains on its
//!   own thread.
//!
//! # Invariants
//! - Submission never blocks; a full queue is reported as `Busy`.
//! - Accepted jobs run to completion; there is no cancellation or timeout.
//! - No ordering is guaranteed between independently submitted jobs.

mod contact_coordinator;
mod ticket;
mod worker_pool;

pub use contact_coordinator::{ContactCoordinator, CoordinatorError, CoordinatorResult};
pub use ticket::Ticket;
