use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{due_back_input_value, BookSummary, Id};

/// Status stored when a submission leaves it blank
pub const DEFAULT_STATUS: &str = "Maintenance";

/// Statuses offered by the form. Other values are accepted and stored as given.
pub const KNOWN_STATUSES: [&str; 4] = ["Available", "Maintenance", "Loaned", "Reserved"];

/// A physical copy of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: Id,
    /// Id of the book this is a copy of
    pub book: Id,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn from_fields(id: Id, fields: BookInstanceFields) -> Self {
        Self {
            id,
            book: fields.book,
            imprint: fields.imprint,
            status: fields.status,
            due_back: fields.due_back,
        }
    }

    pub fn fields(&self) -> BookInstanceFields {
        BookInstanceFields {
            book: self.book.clone(),
            imprint: self.imprint.clone(),
            status: self.status.clone(),
            due_back: self.due_back,
        }
    }
}

/// Validated, trimmed and markup-escaped field values ready to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstanceFields {
    pub book: Id,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

/// Form body submitted by the create and update pages.
/// Every field is optional so a missing field reaches validation instead of
/// being rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookInstanceForm {
    pub book: Option<String>,
    pub imprint: Option<String>,
    pub status: Option<String>,
    pub due_back: Option<String>,
}

/// Sanitized but unvalidated submission, kept to repopulate a rejected form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookInstanceDraft {
    pub id: Option<Id>,
    pub book: String,
    pub imprint: String,
    pub status: String,
    /// Raw date text exactly as typed, so an invalid value can be corrected
    pub due_back: String,
}

impl From<&BookInstance> for BookInstanceDraft {
    fn from(instance: &BookInstance) -> Self {
        Self {
            id: Some(instance.id.clone()),
            book: instance.book.clone(),
            imprint: instance.imprint.clone(),
            status: instance.status.clone(),
            due_back: due_back_input_value(instance),
        }
    }
}

/// A copy with its book reference resolved.
/// `book` is `None` when the referenced book no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedBookInstance {
    pub instance: BookInstance,
    pub book: Option<BookSummary>,
}

impl PopulatedBookInstance {
    pub fn book_title(&self) -> &str {
        self.book
            .as_ref()
            .map(|b| b.title.as_str())
            .unwrap_or("(unknown book)")
    }
}
