use anyhow::Result;
use itertools::Itertools;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::model::{
    generate_id, Book, BookInstance, BookInstanceFields, BookSummary, Id, PopulatedBookInstance,
};
use crate::store::traits::{BookInstanceStore, BookStore, Store};

/// Process-local store used for development and tests. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: RwLock<HashMap<Id, Book>>,
    book_instances: RwLock<HashMap<Id, BookInstance>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn populate(&self, instance: BookInstance) -> PopulatedBookInstance {
        let book = self
            .books
            .read()
            .get(&instance.book)
            .cloned()
            .map(BookSummary::from);
        PopulatedBookInstance { instance, book }
    }
}

#[async_trait::async_trait]
impl BookStore for MemoryStore {
    async fn list_books_for_selection(&self) -> Result<Vec<BookSummary>> {
        Ok(self
            .books
            .read()
            .values()
            .cloned()
            .map(BookSummary::from)
            .sorted_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)))
            .collect())
    }

    async fn get_book(&self, id: &Id) -> Result<Option<Book>> {
        Ok(self.books.read().get(id).cloned())
    }

    async fn upsert_book(&self, book: Book) -> Result<()> {
        self.books.write().insert(book.id.clone(), book);
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookInstanceStore for MemoryStore {
    async fn create_book_instance(&self, fields: BookInstanceFields) -> Result<BookInstance> {
        let instance = BookInstance::from_fields(generate_id(), fields);
        self.book_instances
            .write()
            .insert(instance.id.clone(), instance.clone());
        Ok(instance)
    }

    async fn get_book_instance(&self, id: &Id) -> Result<Option<BookInstance>> {
        Ok(self.book_instances.read().get(id).cloned())
    }

    async fn get_book_instance_with_book(&self, id: &Id) -> Result<Option<PopulatedBookInstance>> {
        let instance = self.book_instances.read().get(id).cloned();
        Ok(instance.map(|i| self.populate(i)))
    }

    async fn list_book_instances(&self) -> Result<Vec<PopulatedBookInstance>> {
        let instances: Vec<BookInstance> = self.book_instances.read().values().cloned().collect();
        Ok(instances
            .into_iter()
            .map(|i| self.populate(i))
            .sorted_by(|a, b| {
                let title = |p: &PopulatedBookInstance| p.book.as_ref().map(|b| b.title.clone());
                // copies whose book is gone sort last
                title(a)
                    .is_none()
                    .cmp(&title(b).is_none())
                    .then_with(|| title(a).cmp(&title(b)))
                    .then_with(|| a.instance.imprint.cmp(&b.instance.imprint))
                    .then_with(|| a.instance.id.cmp(&b.instance.id))
            })
            .collect())
    }

    async fn update_book_instance(
        &self,
        id: &Id,
        fields: BookInstanceFields,
    ) -> Result<Option<BookInstance>> {
        let mut instances = self.book_instances.write();
        let Some(existing) = instances.get_mut(id) else {
            return Ok(None);
        };
        *existing = BookInstance::from_fields(id.clone(), fields);
        Ok(Some(existing.clone()))
    }

    async fn delete_book_instance(&self, id: &Id) -> Result<bool> {
        Ok(self.book_instances.write().remove(id).is_some())
    }
}

impl Store for MemoryStore {}
