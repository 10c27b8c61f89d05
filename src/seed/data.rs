use anyhow::Result;
use chrono::NaiveDate;

use crate::model::{Book, BookInstanceFields};
use crate::store::traits::Store;

const SEED_BOOKS: [(&str, &str); 4] = [
    ("seed-book-name-of-the-wind", "The Name of the Wind"),
    ("seed-book-wise-mans-fear", "The Wise Man's Fear"),
    ("seed-book-slow-regard", "The Slow Regard of Silent Things"),
    ("seed-book-apes-and-angels", "Apes and Angels"),
];

/// Helper to build copy fields for a seeded book
fn seed_copy(book: &str, imprint: &str, status: &str, due_back: Option<NaiveDate>) -> BookInstanceFields {
    BookInstanceFields {
        book: book.to_string(),
        imprint: imprint.to_string(),
        status: status.to_string(),
        due_back,
    }
}

/// Insert demonstration books and copies. Does nothing if the first seeded
/// book is already present, so repeated startups do not duplicate copies.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    if store.get_book(&SEED_BOOKS[0].0.to_string()).await?.is_some() {
        log::info!("Seed data already present, skipping");
        return Ok(());
    }

    for (id, title) in SEED_BOOKS {
        store
            .upsert_book(Book::new_with_id(id.to_string(), title.to_string()))
            .await?;
    }

    let copies = [
        seed_copy(SEED_BOOKS[0].0, "London Gollancz, 2014.", "Available", None),
        seed_copy(SEED_BOOKS[0].0, "Gollancz, 2011.", "Loaned", NaiveDate::from_ymd_opt(2024, 3, 1)),
        seed_copy(SEED_BOOKS[1].0, "Gollancz, 2011.", "Maintenance", None),
        seed_copy(SEED_BOOKS[2].0, "Gollancz, 2011.", "Reserved", NaiveDate::from_ymd_opt(2024, 4, 15)),
        seed_copy(SEED_BOOKS[3].0, "New York Tom Doherty Associates, 2016.", "Available", None),
    ];
    let count = copies.len();
    for fields in copies {
        store.create_book_instance(fields).await?;
    }

    log::info!("Seeded {} books and {} copies", SEED_BOOKS.len(), count);
    Ok(())
}
