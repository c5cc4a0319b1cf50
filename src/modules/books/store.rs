//! Persistence for books.
//!
//! The free functions map between [`Book`] and rows of the `books` table and
//! run inside a caller-provided [`Session`]. [`BookStore`] composes them into
//! one session per operation and decides when to commit.

use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

use booktracker_db::{Database, DbError, Migration, Session};
use booktracker_http::error::AppError;

use super::models::{Book, CreateBook};
use super::validation::{Changes, NewBook, ValidationError};

pub const BOOKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS books (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    title  TEXT NOT NULL,
    author TEXT NOT NULL,
    rating REAL NOT NULL,
    status TEXT NOT NULL DEFAULT 'Not Read'
);";

pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_init",
        up: BOOKS_TABLE,
    }]
}

/// Failures of a book operation.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("book {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<rusqlite::Error> for BookError {
    fn from(err: rusqlite::Error) -> Self {
        BookError::Storage(DbError::Sqlite(err))
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(_) => AppError::not_found("Book not found"),
            BookError::Invalid(e) => e.into(),
            BookError::Storage(e) => e.into(),
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, author, rating, status FROM books";

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        rating: row.get(3)?,
        status: row.get(4)?,
    })
}

/// Insert a validated book and return its assigned id.
pub fn insert_new(conn: &Connection, book: &NewBook) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO books (title, author, rating, status) VALUES (?1, ?2, ?3, ?4)",
        params![book.title, book.author, book.rating, book.status],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn fetch_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Book>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![id],
        book_from_row,
    )
    .optional()
}

/// Every book in insertion order.
pub fn fetch_all(conn: &Connection) -> rusqlite::Result<Vec<Book>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
    let books = stmt
        .query_map([], book_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(books)
}

/// Write every column of an already-fetched book back to its row.
pub fn update_in_place(conn: &Connection, book: &Book) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE books SET title = ?1, author = ?2, rating = ?3, status = ?4 WHERE id = ?5",
        params![book.title, book.author, book.rating, book.status, book.id],
    )?;
    Ok(())
}

pub fn delete_by_id(conn: &Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
    Ok(())
}

fn require(session: &Session<'_>, id: i64) -> Result<Book, BookError> {
    fetch_by_id(session, id)?.ok_or(BookError::NotFound(id))
}

/// Book operations over an injected database handle.
#[derive(Clone)]
pub struct BookStore {
    db: Database,
}

impl BookStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Book>, BookError> {
        self.db
            .session(|session| -> Result<Vec<Book>, BookError> { Ok(fetch_all(&session)?) })
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Book, BookError> {
        self.db
            .session(move |session| -> Result<Book, BookError> { require(&session, id) })
            .await
    }

    /// Validate and insert; the returned book carries its assigned id.
    pub async fn create(&self, input: CreateBook) -> Result<Book, BookError> {
        let book = input.validate()?;

        let created = self
            .db
            .session(move |session| -> Result<Book, BookError> {
                let id = insert_new(&session, &book)?;
                session.commit()?;
                Ok(Book {
                    id,
                    title: book.title,
                    author: book.author,
                    rating: book.rating,
                    status: book.status,
                })
            })
            .await?;

        tracing::info!(book_id = created.id, "book created");
        Ok(created)
    }

    /// Apply `changes` to an existing book.
    ///
    /// Existence is checked before the changes are validated. Nothing is
    /// written unless both pass.
    pub async fn update<C: Changes>(&self, id: i64, changes: C) -> Result<Book, BookError> {
        let (updated, written) = self
            .db
            .session(move |session| -> Result<(Book, bool), BookError> {
                let mut book = require(&session, id)?;
                let patch = changes.into_patch()?;
                if patch.is_empty() {
                    return Ok((book, false));
                }
                patch.apply(&mut book);
                update_in_place(&session, &book)?;
                session.commit()?;
                Ok((book, true))
            })
            .await?;

        if written {
            tracing::info!(book_id = id, "book updated");
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), BookError> {
        self.db
            .session(move |session| -> Result<(), BookError> {
                require(&session, id)?;
                delete_by_id(&session, id)?;
                session.commit()?;
                Ok(())
            })
            .await?;

        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::UpdateBook;
    use tracing_test::traced_test;

    async fn store() -> BookStore {
        let db = Database::open_in_memory().await.unwrap();
        db.migrate(vec![("books".to_string(), migrations()[0].clone())])
            .await
            .unwrap();
        BookStore::new(db)
    }

    fn input(title: &str, rating: f64, status: Option<&str>) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            author: "Author".to_string(),
            rating,
            status: status.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = store().await;

        let created = store.create(input("Dune", 4.8, None)).await.unwrap();
        let fetched = store.get(created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.title, "Dune");
        assert_eq!(fetched.status, "Not Read");
    }

    #[tokio::test]
    async fn invalid_create_writes_nothing() {
        let store = store().await;

        for rating in [-0.1, 5.1] {
            let err = store.create(input("Bad", rating, None)).await.unwrap_err();
            assert!(matches!(err, BookError::Invalid(_)));
        }
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = store().await;
        for title in ["first", "second", "third"] {
            store.create(input(title, 1.0, None)).await.unwrap();
        }

        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn partial_update_changes_only_supplied_fields() {
        let store = store().await;
        let created = store
            .create(CreateBook {
                title: "A".to_string(),
                author: "B".to_string(),
                rating: 3.0,
                status: Some("Read".to_string()),
            })
            .await
            .unwrap();

        let changes = UpdateBook {
            rating: Some(4.0),
            ..UpdateBook::default()
        };
        let updated = store.update(created.id, changes).await.unwrap();

        assert_eq!(updated.title, "A");
        assert_eq!(updated.author, "B");
        assert_eq!(updated.rating, 4.0);
        assert_eq!(updated.status, "Read");
        assert_eq!(store.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    #[traced_test]
    async fn empty_update_writes_and_logs_nothing() {
        let store = store().await;
        let created = store.create(input("Same", 2.0, None)).await.unwrap();

        let unchanged = store.update(created.id, UpdateBook::default()).await.unwrap();

        assert_eq!(unchanged, created);
        assert!(!logs_contain("book updated"));
    }

    #[tokio::test]
    #[traced_test]
    async fn applied_update_is_logged() {
        let store = store().await;
        let created = store.create(input("Before", 2.0, None)).await.unwrap();

        let changes = UpdateBook {
            title: Some("After".to_string()),
            ..UpdateBook::default()
        };
        store.update(created.id, changes).await.unwrap();

        assert!(logs_contain("book updated"));
    }

    #[tokio::test]
    async fn invalid_update_leaves_record_untouched() {
        let store = store().await;
        let created = store.create(input("Kept", 2.0, None)).await.unwrap();

        let changes = UpdateBook {
            title: Some("Changed".to_string()),
            rating: Some(7.0),
            ..UpdateBook::default()
        };
        let err = store.update(created.id, changes).await.unwrap_err();

        assert!(matches!(err, BookError::Invalid(_)));
        assert_eq!(store.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn missing_id_is_reported_before_bad_input() {
        let store = store().await;

        let changes = UpdateBook {
            rating: Some(99.0),
            ..UpdateBook::default()
        };
        let err = store.update(42, changes).await.unwrap_err();
        assert!(matches!(err, BookError::NotFound(42)));
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let store = store().await;
        let created = store.create(input("Gone", 1.0, None)).await.unwrap();

        store.delete(created.id).await.unwrap();
        assert!(matches!(
            store.delete(created.id).await,
            Err(BookError::NotFound(_))
        ));
        assert!(matches!(
            store.get(created.id).await,
            Err(BookError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = store().await;
        let first = store.create(input("one", 1.0, None)).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create(input("two", 1.0, None)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn list_after_creates_and_deletes() {
        let store = store().await;
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.create(input(&format!("b{i}"), 1.0, None)).await.unwrap().id);
        }
        store.delete(ids[1]).await.unwrap();
        store.delete(ids[3]).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[test]
    fn not_found_maps_to_404_error() {
        let err = AppError::from(BookError::NotFound(3));
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
