use crate::model::{generate_id, Id};
use serde::{Deserialize, Serialize};

/// A catalogued title. Copies of it are tracked as book instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Id,
    pub title: String,
}

impl Book {
    pub fn new(title: String) -> Self {
        Self {
            id: generate_id(),
            title,
        }
    }

    pub fn new_with_id(id: Id, title: String) -> Self {
        Self { id, title }
    }
}

/// The slice of a book needed to populate a selection control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: Id,
    pub title: String,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
        }
    }
}
