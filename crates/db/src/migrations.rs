use rusqlite::{params, OptionalExtension};
use shelf_kernel::Migration;

use crate::{Database, DbResult};

const LEDGER_SQL: &str = "CREATE TABLE IF NOT EXISTS shelf_migrations (
    module     TEXT NOT NULL,
    id         TEXT NOT NULL,
    applied_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
    PRIMARY KEY (module, id)
);";

impl Database {
    /// Applies every migration not yet recorded in the ledger, in the given
    /// order, inside a single transaction. Returns how many were applied.
    pub fn apply_migrations(&self, migrations: &[(String, Migration)]) -> DbResult<usize> {
        self.with_conn(|conn| {
            conn.execute_batch(LEDGER_SQL)?;

            let tx = conn.transaction()?;
            let mut applied = 0;

            for (module, migration) in migrations {
                let seen = tx
                    .query_row(
                        "SELECT 1 FROM shelf_migrations WHERE module = ?1 AND id = ?2;",
                        params![module, migration.id],
                        |_| Ok(()),
                    )
                    .optional()?
                    .is_some();

                if seen {
                    continue;
                }

                tracing::info!(module = %module, migration = migration.id, "applying migration");
                tx.execute_batch(migration.up)?;
                tx.execute(
                    "INSERT INTO shelf_migrations (module, id) VALUES (?1, ?2);",
                    params![module, migration.id],
                )?;
                applied += 1;
            }

            tx.commit()?;
            Ok(applied)
        })
    }
}
