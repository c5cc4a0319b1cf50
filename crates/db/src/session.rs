use std::ops::Deref;

use rusqlite::{Connection, Transaction};

/// Unit-of-work handle to the database.
///
/// Derefs to [`Connection`] for queries. Rolls back on drop unless
/// [`Session::commit`] was called.
pub struct Session<'c> {
    tx: Transaction<'c>,
}

impl<'c> Session<'c> {
    pub(crate) fn new(tx: Transaction<'c>) -> Self {
        Self { tx }
    }

    /// Make every change written through this session durable.
    pub fn commit(self) -> rusqlite::Result<()> {
        self.tx.commit()
    }
}

impl Deref for Session<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}
