//! Remote directory: the Notion database holding one page per entry
//!
//! [`Directory`] is the seam between the reconciler and the remote store.
//! Implementors provide the three raw calls; the provided [`Directory::create`]
//! and [`Directory::update`] add field validation and the create-time
//! existence check.

mod client;
mod payload;

pub use client::NotionClient;

use std::fmt;

use tracing::info;

use crate::bibliography::{is_standard_entry_type, EntryFields};
use crate::error::{LookupError, RemoteError, ValidationError};
use crate::normalize::UNKNOWN_TYPE;

/// Opaque page id assigned by Notion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId(pub String);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five values written to a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    /// `Reference ID` title property
    pub reference_id: String,
    pub title: String,
    pub authors: String,
    pub year: String,
    /// `Item type` select option
    pub item_type: String,
}

impl PageFields {
    pub fn new(reference_id: impl Into<String>, fields: &EntryFields) -> Self {
        Self {
            reference_id: reference_id.into(),
            title: fields.title.clone(),
            authors: fields.authors.clone(),
            year: fields.year.clone(),
            item_type: fields.entry_type.clone(),
        }
    }

    /// Check required fields and the entry type vocabulary
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if self.authors.is_empty() {
            return Err(ValidationError::EmptyField("authors"));
        }
        if self.reference_id.is_empty() {
            return Err(ValidationError::EmptyField("reference_id"));
        }
        if self.item_type != UNKNOWN_TYPE && !is_standard_entry_type(&self.item_type) {
            return Err(ValidationError::UnsupportedEntryType(self.item_type.clone()));
        }
        Ok(())
    }
}

/// Result of a create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new page was submitted
    Created(PageId),
    /// A page with the same Reference ID was already there; nothing was sent
    AlreadyExists(PageId),
}

/// Remote table of pages keyed by Reference ID
pub trait Directory {
    /// Find the page whose Reference ID equals `reference_id`
    fn find_page(&self, reference_id: &str) -> Result<PageId, LookupError>;

    /// Submit a new page without any checks
    fn insert_page(&self, fields: &PageFields) -> Result<PageId, RemoteError>;

    /// Overwrite every property of an existing page
    fn overwrite_page(&self, page: &PageId, fields: &PageFields) -> Result<(), RemoteError>;

    /// Validate, then create the page unless one already exists
    ///
    /// A lookup failure other than `NotFound` aborts the create so an
    /// identifier is never submitted twice.
    fn create(&self, fields: &PageFields) -> Result<CreateOutcome, RemoteError> {
        fields.validate()?;

        match self.find_page(&fields.reference_id) {
            Ok(page) => {
                info!(
                    "Entry with Reference ID '{}' already exists. Skipping creation.",
                    fields.reference_id
                );
                Ok(CreateOutcome::AlreadyExists(page))
            }
            Err(LookupError::NotFound) => {
                let page = self.insert_page(fields)?;
                Ok(CreateOutcome::Created(page))
            }
            Err(err) => Err(RemoteError::Lookup(err)),
        }
    }

    /// Validate, then overwrite `page` with `fields`
    fn update(&self, page: &PageId, fields: &PageFields) -> Result<(), RemoteError> {
        fields.validate()?;
        self.overwrite_page(page, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> PageFields {
        PageFields {
            reference_id: "smith2020".to_string(),
            title: "A Study".to_string(),
            authors: "Smith, J.; Doe, A.".to_string(),
            year: "2020".to_string(),
            item_type: "article".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_fields() {
        assert_eq!(fields().validate(), Ok(()));

        let mut unknown = fields();
        unknown.item_type = UNKNOWN_TYPE.to_string();
        unknown.year = String::new();
        assert_eq!(unknown.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_required_fields() {
        let mut f = fields();
        f.title.clear();
        assert_eq!(f.validate(), Err(ValidationError::EmptyField("title")));

        let mut f = fields();
        f.authors.clear();
        assert_eq!(f.validate(), Err(ValidationError::EmptyField("authors")));

        let mut f = fields();
        f.reference_id.clear();
        assert_eq!(f.validate(), Err(ValidationError::EmptyField("reference_id")));
    }

    #[test]
    fn test_validate_rejects_unknown_vocabulary() {
        let mut f = fields();
        f.item_type = "blogpost".to_string();
        assert_eq!(
            f.validate(),
            Err(ValidationError::UnsupportedEntryType("blogpost".to_string()))
        );
    }
}
