//! Record store: typed CRUD and search over the `contacts` table.
//!
//! # Responsibility
//! - Translate between `Contact` values and rows.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - The store never validates blank fields; callers pass `ContactDraft`
//!   through the repository for that.
//! - A closed connection surfaces as `DbError::Unavailable`, never as an
//!   empty result.

pub mod contact_store;
