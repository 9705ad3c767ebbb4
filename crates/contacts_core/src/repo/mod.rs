//! Repository layer over the record store.
//!
//! # Responsibility
//! - Offer use-case level contact operations to coordinators and UIs.
//! - Surface store failures as data (`RepoError`) instead of swallowing them.
//!
//! # Invariants
//! - Writes accept only validated `ContactDraft` input.
//! - Repository methods never panic on store failure.

pub mod contact_repo;
