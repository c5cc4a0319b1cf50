use rusqlite::{params, OptionalExtension};

use crate::database::{Database, DbError};

/// Schema bootstrap statement contributed by a module.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

const HISTORY_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    module     TEXT NOT NULL,
    id         TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (module, id)
);";

impl Database {
    /// Apply every `(module, migration)` pair that has not run yet.
    ///
    /// All pending statements run in one session; if any fails nothing is
    /// recorded. Returns the number of migrations applied.
    pub async fn migrate(&self, migrations: Vec<(String, Migration)>) -> Result<usize, DbError> {
        let applied = self
            .session(move |session| -> Result<Vec<String>, DbError> {
                session.execute_batch(HISTORY_TABLE)?;

                let mut applied = Vec::new();
                for (module, migration) in &migrations {
                    let seen = session
                        .query_row(
                            "SELECT 1 FROM schema_migrations WHERE module = ?1 AND id = ?2",
                            params![module, migration.id],
                            |_| Ok(()),
                        )
                        .optional()?;
                    if seen.is_some() {
                        continue;
                    }

                    session.execute_batch(migration.up)?;
                    session.execute(
                        "INSERT INTO schema_migrations (module, id) VALUES (?1, ?2)",
                        params![module, migration.id],
                    )?;
                    applied.push(format!("{module}/{}", migration.id));
                }

                session.commit()?;
                Ok(applied)
            })
            .await?;

        for name in &applied {
            tracing::info!(target: "booktracker-db", migration = %name, "migration applied");
        }
        Ok(applied.len())
    }
}
