use std::path::Path;

use thiserror::Error;

use crate::session::Session;

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database at '{path}': {source}")]
    Open {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection is closed")]
    ConnectionClosed,

    #[error("failed to close database: {0}")]
    Close(String),
}

/// Process-wide handle to the SQLite database.
///
/// Cloning is cheap; every clone talks to the same background connection
/// thread, so writes are serialized without explicit locking.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let shown = path.as_ref().display().to_string();
        let conn = tokio_rusqlite::Connection::open(path.as_ref())
            .await
            .map_err(|e| DbError::Open {
                path: shown.clone(),
                source: Box::new(e),
            })?;

        let db = Self { conn };
        db.configure().await?;
        tracing::info!(target: "booktracker-db", path = %shown, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database. Used by tests and `:memory:` setups.
    pub async fn open_in_memory() -> Result<Self, DbError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| DbError::Open {
                path: ":memory:".to_string(),
                source: Box::new(e),
            })?;

        let db = Self { conn };
        db.configure().await?;
        Ok(db)
    }

    async fn configure(&self) -> Result<(), DbError> {
        self.conn
            .call(|conn| -> Result<(), DbError> {
                conn.execute_batch("PRAGMA foreign_keys = ON;")?;
                Ok(())
            })
            .await
            .map_err(unwrap_call_error)
    }

    /// Run `work` inside a scoped session.
    ///
    /// The session is released when `work` returns, whatever the outcome.
    /// Nothing it wrote is visible to other sessions unless `work` called
    /// [`Session::commit`].
    pub async fn session<F, R, E>(&self, work: F) -> Result<R, E>
    where
        F: FnOnce(Session<'_>) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<DbError> + Send + 'static,
    {
        self.conn
            .call(move |conn| -> Result<R, E> {
                let tx = conn
                    .transaction()
                    .map_err(|e| E::from(DbError::Sqlite(e)))?;
                work(Session::new(tx))
            })
            .await
            .map_err(unwrap_call_error)
    }

    /// Close the background connection. Pending sessions finish first.
    pub async fn close(self) -> Result<(), DbError> {
        self.conn
            .close()
            .await
            .map_err(|e| DbError::Close(e.to_string()))
    }
}

/// Flatten the connection-thread error wrapper back into the caller's type.
fn unwrap_call_error<E: From<DbError>>(err: tokio_rusqlite::Error<E>) -> E {
    match err {
        tokio_rusqlite::Error::Error(e) => e,
        _ => E::from(DbError::ConnectionClosed),
    }
}
