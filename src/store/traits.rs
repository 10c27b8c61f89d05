use crate::model::{Book, BookInstance, BookInstanceFields, BookSummary, Id, PopulatedBookInstance};
use anyhow::Result;

/// Read access to books, plus the insert used by seeding
#[async_trait::async_trait]
pub trait BookStore: Send + Sync {
    /// Every book as `{id, title}`, ordered by title. No filtering or paging.
    async fn list_books_for_selection(&self) -> Result<Vec<BookSummary>>;
    async fn get_book(&self, id: &Id) -> Result<Option<Book>>;
    async fn upsert_book(&self, book: Book) -> Result<()>;
}

/// Persistence for book copies.
///
/// An `Err` always means the store itself failed. A missing record is reported
/// as `None` or `false` so callers can tell the two apart.
#[async_trait::async_trait]
pub trait BookInstanceStore: Send + Sync {
    /// Persist a new copy under a freshly generated id
    async fn create_book_instance(&self, fields: BookInstanceFields) -> Result<BookInstance>;
    async fn get_book_instance(&self, id: &Id) -> Result<Option<BookInstance>>;
    /// Fetch a copy with its book reference resolved
    async fn get_book_instance_with_book(&self, id: &Id) -> Result<Option<PopulatedBookInstance>>;
    /// All copies with their books resolved, ordered by book title then imprint
    async fn list_book_instances(&self) -> Result<Vec<PopulatedBookInstance>>;
    /// Replace every field of an existing copy. The id is kept.
    async fn update_book_instance(
        &self,
        id: &Id,
        fields: BookInstanceFields,
    ) -> Result<Option<BookInstance>>;
    /// Returns whether a record was removed. The referenced book is untouched.
    async fn delete_book_instance(&self, id: &Id) -> Result<bool>;
}

pub trait Store: BookStore + BookInstanceStore + Send + Sync {}
