//! Contact record and validated input.
//!
//! # Invariants
//! - `id` is unique and stable for the record lifetime.
//! - Blank-field validation lives in `ContactDraft`, never in the store.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned contact identifier (`contacts._id`).
pub type ContactId = i64;

/// One persisted contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
}

impl Contact {
    pub fn new(id: ContactId, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Returns a copy of this contact carrying the draft's fields.
    pub fn with_draft(&self, draft: &ContactDraft) -> Self {
        Self {
            id: self.id,
            name: draft.name().to_string(),
            phone: draft.phone().to_string(),
        }
    }
}

/// Which required field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    BlankName,
    BlankPhone,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "contact name cannot be blank"),
            Self::BlankPhone => write!(f, "contact phone cannot be blank"),
        }
    }
}

impl Error for ContactValidationError {}

/// User input for creating or editing a contact.
///
/// Fields are kept exactly as typed; only all-whitespace values are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    name: String,
    phone: String,
}

impl ContactDraft {
    /// Validates and wraps user input.
    ///
    /// # Errors
    /// - `BlankName` when `name` is empty or whitespace only (checked first).
    /// - `BlankPhone` when `phone` is empty or whitespace only.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ContactValidationError> {
        let name = name.into();
        let phone = phone.into();
        if name.trim().is_empty() {
            return Err(ContactValidationError::BlankName);
        }
        if phone.trim().is_empty() {
            return Err(ContactValidationError::BlankPhone);
        }
        Ok(Self { name, phone })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }
}

impl TryFrom<&Contact> for ContactDraft {
    type Error = ContactValidationError;

    fn try_from(contact: &Contact) -> Result<Self, Self::Error> {
        Self::new(contact.name.clone(), contact.phone.clone())
    }
}
