//! SQLite persistence plumbing shared by the feature modules.
//!
//! The [`Database`] handle owns a single connection behind a mutex; each
//! repository call locks it for the duration of one statement or one
//! transaction.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rusqlite::Connection;
use shelf_kernel::settings::DatabaseSettings;

mod migrations;
mod page;

pub use page::Page;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("database connection lock poisoned")]
    Poisoned,
}

/// Cloneable handle to the application database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens the database described by the settings and configures pragmas.
    pub fn open(settings: &DatabaseSettings) -> DbResult<Self> {
        if settings.is_in_memory() {
            return Self::open_in_memory();
        }

        let started_at = Instant::now();
        let conn = Connection::open(&settings.path).inspect_err(|err| {
            tracing::error!(path = %settings.path, error = %err, "failed to open database");
        })?;
        let db = Self::bootstrap(conn)?;

        tracing::info!(
            path = %settings.path,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "database opened"
        );
        Ok(db)
    }

    /// Opens a private in-memory database, used by tests and `:memory:` configs.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self::bootstrap(conn)?;
        tracing::info!("in-memory database opened");
        Ok(db)
    }

    fn bootstrap(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> DbResult<T>) -> DbResult<T> {
        let mut conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&mut *conn)
    }
}
