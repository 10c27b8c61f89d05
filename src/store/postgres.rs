use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};

use crate::model::{
    generate_id, Book, BookInstance, BookInstanceFields, BookSummary, Id, PopulatedBookInstance,
};
use crate::store::traits::{BookInstanceStore, BookStore, Store};

const SELECT_POPULATED: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, b.title AS book_title
    FROM book_instances bi
    LEFT JOIN books b ON b.id = bi.book_id
"#;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the catalog tables if they are missing
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create books table")?;

        // book_id carries no foreign key; references are only checked on input
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS book_instances (
                id TEXT PRIMARY KEY,
                book_id TEXT NOT NULL,
                imprint TEXT NOT NULL,
                status TEXT NOT NULL,
                due_back DATE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create book_instances table")?;

        log::info!("Catalog tables ready");
        Ok(())
    }
}

fn row_to_instance(row: &PgRow) -> BookInstance {
    BookInstance {
        id: row.get("id"),
        book: row.get("book_id"),
        imprint: row.get("imprint"),
        status: row.get("status"),
        due_back: row.get("due_back"),
    }
}

fn row_to_populated(row: &PgRow) -> PopulatedBookInstance {
    let instance = row_to_instance(row);
    let book = row
        .get::<Option<String>, _>("book_title")
        .map(|title| BookSummary {
            id: instance.book.clone(),
            title,
        });
    PopulatedBookInstance { instance, book }
}

#[async_trait::async_trait]
impl BookStore for PostgresStore {
    async fn list_books_for_selection(&self) -> Result<Vec<BookSummary>> {
        let rows = sqlx::query("SELECT id, title FROM books ORDER BY title, id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list books")?;

        Ok(rows
            .into_iter()
            .map(|row| BookSummary {
                id: row.get("id"),
                title: row.get("title"),
            })
            .collect())
    }

    async fn get_book(&self, id: &Id) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT id, title FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch book")?;

        Ok(row.map(|row| Book {
            id: row.get("id"),
            title: row.get("title"),
        }))
    }

    async fn upsert_book(&self, book: Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET title = EXCLUDED.title
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .execute(&self.pool)
        .await
        .context("Failed to upsert book")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl BookInstanceStore for PostgresStore {
    async fn create_book_instance(&self, fields: BookInstanceFields) -> Result<BookInstance> {
        let instance = BookInstance::from_fields(generate_id(), fields);

        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&instance.id)
        .bind(&instance.book)
        .bind(&instance.imprint)
        .bind(&instance.status)
        .bind(instance.due_back)
        .execute(&self.pool)
        .await
        .context("Failed to insert book instance")?;

        Ok(instance)
    }

    async fn get_book_instance(&self, id: &Id) -> Result<Option<BookInstance>> {
        let row = sqlx::query(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch book instance")?;

        Ok(row.as_ref().map(row_to_instance))
    }

    async fn get_book_instance_with_book(&self, id: &Id) -> Result<Option<PopulatedBookInstance>> {
        let row = sqlx::query(&format!("{} WHERE bi.id = $1", SELECT_POPULATED))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch book instance with book")?;

        Ok(row.as_ref().map(row_to_populated))
    }

    async fn list_book_instances(&self) -> Result<Vec<PopulatedBookInstance>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY b.title NULLS LAST, bi.imprint, bi.id",
            SELECT_POPULATED
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list book instances")?;

        Ok(rows.iter().map(row_to_populated).collect())
    }

    async fn update_book_instance(
        &self,
        id: &Id,
        fields: BookInstanceFields,
    ) -> Result<Option<BookInstance>> {
        let instance = BookInstance::from_fields(id.clone(), fields);

        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            "#,
        )
        .bind(&instance.id)
        .bind(&instance.book)
        .bind(&instance.imprint)
        .bind(&instance.status)
        .bind(instance.due_back)
        .execute(&self.pool)
        .await
        .context("Failed to update book instance")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(instance))
    }

    async fn delete_book_instance(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete book instance")?;

        Ok(result.rows_affected() > 0)
    }
}

impl Store for PostgresStore {}
