//! Contact list repository.
//!
//! # Responsibility
//! - Wrap record store calls with validated input and typed failures.
//! - Deliver search results through either a `Result` or success/failure
//!   callbacks.
//! - Offer lossy adapters that reproduce the legacy "empty/zero/-1" results.
//!
//! # Invariants
//! - `search_with` invokes exactly one of its callbacks, exactly once.
//! - Lossy adapters are the only place where store failures are coalesced
//!   with empty results.

use crate::model::contact::{Contact, ContactDraft, ContactId, ContactValidationError};
use crate::store::contact_store::{ContactStore, StoreError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sentinel id returned by [`ContactListRepository::insert_or_sentinel`] on failure.
pub const INSERT_FAILED_ID: ContactId = -1;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact use-cases.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Store(StoreError),
}

impl RepoError {
    /// Returns whether the store could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_unavailable())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case facade over a [`ContactStore`] implementation.
pub struct ContactListRepository<S: ContactStore> {
    store: S,
}

impl<S: ContactStore> ContactListRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists a new contact and returns it with its assigned id.
    pub fn add(&self, draft: &ContactDraft) -> RepoResult<Contact> {
        let id = self.store.insert(draft.name(), draft.phone())?;
        Ok(Contact::new(id, draft.name(), draft.phone()))
    }

    pub fn list(&self) -> RepoResult<Vec<Contact>> {
        Ok(self.store.fetch_all()?)
    }

    pub fn get(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        Ok(self.store.find_by_id(id)?)
    }

    /// Returns contacts whose name contains `query`.
    pub fn search(&self, query: &str) -> RepoResult<Vec<Contact>> {
        Ok(self.store.search(query)?)
    }

    /// Runs [`Self::search`] and hands the outcome to exactly one callback.
    pub fn search_with<F, E>(&self, query: &str, on_success: F, on_failure: E)
    where
        F: FnOnce(Vec<Contact>),
        E: FnOnce(RepoError),
    {
        match self.search(query) {
            Ok(contacts) => on_success(contacts),
            Err(err) => on_failure(err),
        }
    }

    /// Replaces both fields of contact `id`; returns rows affected (0 or 1).
    pub fn update(&self, id: ContactId, draft: &ContactDraft) -> RepoResult<usize> {
        let contact = Contact::new(id, draft.name(), draft.phone());
        Ok(self.store.update(&contact)?)
    }

    /// Writes an edited contact back after re-validating its fields.
    pub fn update_contact(&self, contact: &Contact) -> RepoResult<usize> {
        let draft = ContactDraft::try_from(contact)?;
        self.update(contact.id, &draft)
    }

    /// Removes contact `id`; returns rows affected (0 or 1).
    pub fn delete(&self, id: ContactId) -> RepoResult<usize> {
        Ok(self.store.delete_by_id(id)?)
    }

    /// Legacy insert: returns [`INSERT_FAILED_ID`] instead of an error.
    pub fn insert_or_sentinel(&self, name: &str, phone: &str) -> ContactId {
        self.store.insert(name, phone).unwrap_or_else(|err| {
            warn!("event=contact_insert module=repo status=coalesced error={}", err);
            INSERT_FAILED_ID
        })
    }

    /// Legacy listing: store failures read as an empty list.
    pub fn list_or_empty(&self) -> Vec<Contact> {
        self.store.fetch_all().unwrap_or_else(|err| {
            warn!("event=contact_fetch_all module=repo status=coalesced error={}", err);
            Vec::new()
        })
    }

    /// Legacy search: store failures read as "no matches".
    pub fn search_or_empty(&self, query: &str) -> Vec<Contact> {
        self.store.search(query).unwrap_or_else(|err| {
            warn!("event=contact_search module=repo status=coalesced error={}", err);
            Vec::new()
        })
    }

    /// Legacy update: store failures read as zero affected rows.
    pub fn update_or_zero(&self, contact: &Contact) -> usize {
        self.store.update(contact).unwrap_or_else(|err| {
            warn!("event=contact_update module=repo status=coalesced error={}", err);
            0
        })
    }

    /// Legacy delete: store failures read as zero affected rows.
    pub fn delete_or_zero(&self, id: ContactId) -> usize {
        self.store.delete_by_id(id).unwrap_or_else(|err| {
            warn!("event=contact_delete module=repo status=coalesced error={}", err);
            0
        })
    }
}
