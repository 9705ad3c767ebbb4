//! Contact domain model.
//!
//! # Responsibility
//! - Define the stored `Contact` record and the `ContactDraft` input shape.
//!
//! # Invariants
//! - A `Contact` id is assigned by the store and never reused.
//! - A `ContactDraft` always carries non-blank name and phone.

pub mod contact;
